//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e la discovery delle immagini sorgente.
//!
//! ## Responsabilità:
//! - Discovery (non ricorsiva) dei file JPEG nella directory sorgente
//! - Riconoscimento estensioni `.jpg` / `.jpeg` case-insensitive
//! - Utilità per calcoli dimensioni e percentuali di riduzione
//! - Formattazione delle dimensioni per l'output console
//!
//! ## Regole di discovery:
//! - Solo le entry dirette della directory (profondità 1)
//! - Solo file regolari (i symlink a file vengono risolti, le directory ignorate)
//! - Risultato ordinato per nome file, per un output deterministico
//! - Una directory senza JPEG non è un errore: ritorna una lista vuota
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = FileManager::find_jpeg_files(Path::new("./source_images"))?;
//! for file in files {
//!     // optimize file
//! }
//! ```

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Size of a file in bytes
    pub fn file_size(path: &Path) -> std::io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    /// Find all JPEG files directly inside a directory, sorted by file name.
    ///
    /// Failing to read the directory itself is an error; an unreadable entry
    /// inside it is logged and skipped.
    pub fn find_jpeg_files(source_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(source_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(anyhow::Error::new(err)
                        .context(format!("Failed to read directory {}", source_dir.display())));
                }
                Err(err) => {
                    warn!("Skipping unreadable entry in {}: {}", source_dir.display(), err);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if Self::is_jpeg(path) {
                files.push(path.to_path_buf());
            } else {
                debug!("Ignoring non-JPEG file: {}", path.display());
            }
        }

        Ok(files)
    }

    /// Check if a file has a JPEG extension (any letter case)
    pub fn is_jpeg(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            matches!(ext_lower.as_str(), "jpg" | "jpeg")
        } else {
            false
        }
    }

    /// Whole kilobytes, truncated
    pub fn format_kb(size: u64) -> String {
        format!("{}KB", size / 1024)
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }

    pub fn round_to_hundredths(value: f64) -> f64 {
        (value * 100.0).round() / 100.0
    }

    /// Percentage as printed in per-file lines: whole numbers keep one
    /// decimal (`50.0`), others print as stored (`79.88`)
    pub fn format_percent(value: f64) -> String {
        if value.fract() == 0.0 {
            format!("{:.1}", value)
        } else {
            format!("{}", value)
        }
    }
}
