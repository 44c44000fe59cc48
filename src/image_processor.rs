//! # Image Processing Module
//!
//! Questo modulo ottimizza una singola immagine JPEG interamente in-process:
//! decode e resize con il crate `image`, re-encode con `jpeg-encoder`.
//!
//! ## Pipeline di Ottimizzazione
//!
//! 1. **Dimensione originale**: misurata prima di qualsiasi scrittura
//! 2. **Decode**: formato rilevato dal contenuto, con fallback sull'estensione
//! 3. **Conversione RGB**: immagini con alpha, palette o scala di grigi vengono
//!    convertite in RGB8 (la trasparenza viene persa)
//! 4. **Resize**: solo se `width > max_width`, con filtro Lanczos3;
//!    altezza = `floor(height * max_width / width)`
//! 5. **Encode**: JPEG alla qualità configurata con tabelle Huffman ottimizzate,
//!    sovrascrivendo l'output
//! 6. **Statistiche**: nuova dimensione e percentuale di riduzione (2 decimali)
//!
//! ## Error Handling
//!
//! Ogni errore viene ritornato come `OptimizeError` al chiamante, che lo logga
//! e passa al file successivo. Se l'encode fallisce dopo aver creato il file di
//! output, il file parziale viene rimosso.
//!
//! ## Memoria
//!
//! Il buffer decodificato vive solo dentro `optimize()`: al massimo un'immagine
//! non compressa è residente in memoria alla volta.
//!
//! ## Esempio
//!
//! ```rust,ignore
//! let processor = ImageProcessor::new(1920, 85);
//! let record = processor.optimize(
//!     Path::new("source_images/IMG_001.JPG"),
//!     Path::new("public/images/IMG_001.jpg"),
//! )?;
//! println!("{} -> {}", record.filename, record.dimensions());
//! ```

use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use jpeg_encoder::{ColorType, Encoder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Result of optimizing one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Basename of the output file
    pub filename: String,
    pub original_size: u64,
    pub new_size: u64,
    /// `(original - new) / original * 100`, rounded to 2 decimals
    pub reduction_percent: f64,
    pub width: u32,
    pub height: u32,
}

impl ImageRecord {
    /// Output dimensions as `"<width>x<height>"`
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Decodes, downsizes and recompresses JPEG images.
///
/// Holds only the two tuning parameters; every call to [`ImageProcessor::optimize`]
/// is independent of the others.
#[derive(Debug, Clone, Copy)]
pub struct ImageProcessor {
    max_width: u32,
    quality: u8,
}

impl ImageProcessor {
    pub fn new(max_width: u32, quality: u8) -> Self {
        Self { max_width, quality }
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Optimizes `input_path` into `output_path`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - the input cannot be read or its size measured
    /// - the input cannot be decoded (corrupt or unsupported data)
    /// - the output cannot be created or the JPEG encoder fails
    pub fn optimize(&self, input_path: &Path, output_path: &Path) -> Result<ImageRecord, OptimizeError> {
        let original_size = FileManager::file_size(input_path)?;

        let decoded = image::io::Reader::open(input_path)?
            .with_guessed_format()?
            .decode()?;
        let rgb = Self::into_rgb(decoded);

        let (width, height) = rgb.dimensions();
        let (new_width, new_height) = target_dimensions(width, height, self.max_width);
        let rgb = if (new_width, new_height) != (width, height) {
            debug!(
                "Resizing {} from {}x{} to {}x{}",
                input_path.display(),
                width,
                height,
                new_width,
                new_height
            );
            image::imageops::resize(&rgb, new_width, new_height, FilterType::Lanczos3)
        } else {
            rgb
        };

        if let Err(e) = self.encode(&rgb, output_path) {
            if output_path.exists() {
                if let Err(cleanup) = std::fs::remove_file(output_path) {
                    warn!("Failed to remove partial output {}: {}", output_path.display(), cleanup);
                }
            }
            return Err(e);
        }

        let new_size = FileManager::file_size(output_path)?;
        let reduction = FileManager::calculate_reduction(original_size, new_size);

        let filename = output_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                OptimizeError::Validation(format!("Invalid output path: {}", output_path.display()))
            })?;

        Ok(ImageRecord {
            filename,
            original_size,
            new_size,
            reduction_percent: FileManager::round_to_hundredths(reduction),
            width: rgb.width(),
            height: rgb.height(),
        })
    }

    fn into_rgb(image: DynamicImage) -> RgbImage {
        match image {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => {
                debug!("Converting {:?} image to RGB8", other.color());
                other.to_rgb8()
            }
        }
    }

    fn encode(&self, image: &RgbImage, output_path: &Path) -> Result<(), OptimizeError> {
        let (width, height) = match (u16::try_from(image.width()), u16::try_from(image.height())) {
            (Ok(width), Ok(height)) => (width, height),
            _ => {
                return Err(OptimizeError::Validation(format!(
                    "{}x{} exceeds the JPEG size limit",
                    image.width(),
                    image.height()
                )))
            }
        };

        let file = File::create(output_path)?;
        let mut writer = BufWriter::new(file);
        let mut encoder = Encoder::new(&mut writer, self.quality);
        encoder.set_optimized_huffman_tables(true);
        encoder.encode(image.as_raw(), width, height, ColorType::Rgb)?;
        writer.flush()?;
        Ok(())
    }
}

/// Output dimensions for an image of `width` x `height` under `max_width`.
///
/// Images already within the limit keep their size. Wider images get exactly
/// `max_width` columns and `floor(height * max_width / width)` rows (at least 1).
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let ratio = max_width as f64 / width as f64;
    let new_height = (height as f64 * ratio).floor() as u32;
    (max_width, new_height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};
    use tempfile::TempDir;

    fn write_jpeg(path: &Path, width: u32, height: u32) {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        img.save_with_format(path, image::ImageFormat::Jpeg).unwrap();
    }

    #[test]
    fn test_target_dimensions_within_limit() {
        assert_eq!(target_dimensions(800, 600, 1920), (800, 600));
        assert_eq!(target_dimensions(1920, 1080, 1920), (1920, 1080));
    }

    #[test]
    fn test_target_dimensions_scaled() {
        assert_eq!(target_dimensions(3000, 2000, 1920), (1920, 1280));
        assert_eq!(target_dimensions(4000, 3001, 1920), (1920, 1440));
        assert_eq!(target_dimensions(1000, 333, 100), (100, 33));
    }

    #[test]
    fn test_target_dimensions_never_zero_height() {
        assert_eq!(target_dimensions(10_000, 1, 100), (100, 1));
    }

    #[test]
    fn test_optimize_resizes_wide_image() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("wide.JPG");
        let output = temp_dir.path().join("out.jpg");
        write_jpeg(&input, 300, 200);

        let processor = ImageProcessor::new(120, 85);
        let record = processor.optimize(&input, &output).unwrap();

        assert_eq!(record.filename, "out.jpg");
        assert_eq!((record.width, record.height), (120, 80));
        assert_eq!(record.dimensions(), "120x80");
        assert_eq!(image::image_dimensions(&output).unwrap(), (120, 80));
        assert_eq!(record.original_size, std::fs::metadata(&input).unwrap().len());
        assert_eq!(record.new_size, std::fs::metadata(&output).unwrap().len());

        let expected = FileManager::round_to_hundredths(FileManager::calculate_reduction(
            record.original_size,
            record.new_size,
        ));
        assert_eq!(record.reduction_percent, expected);
    }

    #[test]
    fn test_optimize_keeps_small_image_dimensions() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("small.jpg");
        let output = temp_dir.path().join("small_out.jpg");
        write_jpeg(&input, 64, 48);

        let record = ImageProcessor::new(1920, 85).optimize(&input, &output).unwrap();
        assert_eq!((record.width, record.height), (64, 48));
        assert_eq!(image::image_dimensions(&output).unwrap(), (64, 48));
    }

    #[test]
    fn test_optimize_converts_alpha_to_rgb() {
        let temp_dir = TempDir::new().unwrap();
        // PNG data behind a .jpg name: detected from content, alpha dropped
        let input = temp_dir.path().join("transparent.jpg");
        let img = ImageBuffer::from_pixel(40, 20, Rgba([10u8, 200, 30, 0]));
        img.save_with_format(&input, image::ImageFormat::Png).unwrap();
        let output = temp_dir.path().join("transparent_out.jpg");

        let record = ImageProcessor::new(1920, 85).optimize(&input, &output).unwrap();
        assert_eq!(record.dimensions(), "40x20");

        let reopened = image::open(&output).unwrap();
        assert_eq!(reopened.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_optimize_corrupt_file_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("corrupt.jpg");
        std::fs::write(&input, b"definitely not a jpeg").unwrap();
        let output = temp_dir.path().join("corrupt_out.jpg");

        let result = ImageProcessor::new(1920, 85).optimize(&input, &output);
        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_optimize_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let result = ImageProcessor::new(1920, 85)
            .optimize(&temp_dir.path().join("nope.jpg"), &temp_dir.path().join("out.jpg"));
        assert!(matches!(result, Err(OptimizeError::Io(_))));
    }

    #[test]
    fn test_optimize_overwrites_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("photo.jpg");
        let output = temp_dir.path().join("photo_out.jpg");
        write_jpeg(&input, 50, 50);
        std::fs::write(&output, vec![0u8; 500_000]).unwrap();

        let record = ImageProcessor::new(1920, 85).optimize(&input, &output).unwrap();
        assert!(record.new_size < 500_000);
        assert_eq!(std::fs::metadata(&output).unwrap().len(), record.new_size);
    }

    /// BITS counts of every Huffman table, keyed by (class, id)
    fn huffman_bits(jpeg: &[u8]) -> Vec<((u8, u8), [u8; 16])> {
        let mut tables = Vec::new();
        let mut pos = 2;
        while pos + 4 <= jpeg.len() && jpeg[pos] == 0xFF {
            let marker = jpeg[pos + 1];
            if marker == 0xDA {
                break;
            }
            let len = u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]) as usize;
            let segment = &jpeg[pos + 4..pos + 2 + len];
            if marker == 0xC4 {
                let mut offset = 0;
                while offset < segment.len() {
                    let class_id = segment[offset];
                    let mut bits = [0u8; 16];
                    bits.copy_from_slice(&segment[offset + 1..offset + 17]);
                    let symbols: usize = bits.iter().map(|&b| b as usize).sum();
                    tables.push(((class_id >> 4, class_id & 0x0F), bits));
                    offset += 17 + symbols;
                }
            }
            pos += 2 + len;
        }
        tables
    }

    #[test]
    fn test_output_uses_optimized_huffman_tables() {
        const STANDARD_LUMA_DC_BITS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];

        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("photo.jpg");
        let output = temp_dir.path().join("photo_out.jpg");
        write_jpeg(&input, 64, 64);

        ImageProcessor::new(1920, 85).optimize(&input, &output).unwrap();

        let tables = huffman_bits(&std::fs::read(&output).unwrap());
        let luma_dc = tables
            .iter()
            .find(|(key, _)| *key == (0, 0))
            .map(|(_, bits)| *bits)
            .expect("luma DC table present");
        assert_ne!(luma_dc, STANDARD_LUMA_DC_BITS);
    }

    #[test]
    fn test_lower_quality_gives_smaller_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("photo.jpg");
        write_jpeg(&input, 200, 200);

        let high = ImageProcessor::new(1920, 95)
            .optimize(&input, &temp_dir.path().join("high.jpg"))
            .unwrap();
        let low = ImageProcessor::new(1920, 10)
            .optimize(&input, &temp_dir.path().join("low.jpg"))
            .unwrap();
        assert!(low.new_size < high.new_size);
    }
}
