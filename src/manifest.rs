//! # Gallery Manifest Module
//!
//! Questo modulo produce `gallery.json`, il documento che descrive la galleria
//! generata per il sito statico.
//!
//! ## Strutture dati:
//! - `GalleryEntry`: una voce per immagine (filename, path pubblico, alt text)
//! - `Manifest`: timestamp di generazione + lista ordinata di voci
//! - `ManifestWriter`: scrive il manifest nella directory di output
//!
//! ## Strategia di persistence:
//! - Un solo file per run: `<output_dir>/gallery.json`
//! - Scritto una sola volta, dopo il loop, con una singola write
//! - Sovrascrive sempre un manifest precedente
//! - Nessun file se nessuna immagine è stata elaborata
//!
//! ## Esempio struttura manifest:
//! ```json
//! {
//!   "generated": "2024-05-01T18:22:03.512094",
//!   "images": [
//!     {
//!       "filename": "IMG_001.jpg",
//!       "path": "/images/IMG_001.jpg",
//!       "alt": "Gallery image 1"
//!     }
//!   ]
//! }
//! ```

use crate::image_processor::ImageRecord;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_FILE_NAME: &str = "gallery.json";

/// One image as listed in the gallery manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    pub filename: String,
    pub path: String,
    pub alt: String,
}

impl GalleryEntry {
    /// Builds the entry for the `index`-th (1-based) successfully processed image
    pub fn new(record: &ImageRecord, index: usize, url_prefix: &str) -> Self {
        Self {
            filename: record.filename.clone(),
            path: format!("{}/{}", url_prefix.trim_end_matches('/'), record.filename),
            alt: format!("Gallery image {}", index),
        }
    }
}

/// The gallery.json document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// ISO-8601 local timestamp of generation
    pub generated: String,
    pub images: Vec<GalleryEntry>,
}

impl Manifest {
    pub fn new(images: Vec<GalleryEntry>) -> Self {
        Self {
            generated: chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            images,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a manifest back from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Writes the gallery manifest into the output directory
pub struct ManifestWriter;

impl ManifestWriter {
    pub fn manifest_path(output_dir: &Path) -> PathBuf {
        output_dir.join(MANIFEST_FILE_NAME)
    }

    /// Write `entries` to `<output_dir>/gallery.json`.
    ///
    /// Returns `None` without touching the filesystem when `entries` is empty.
    pub fn write(entries: &[GalleryEntry], output_dir: &Path) -> Result<Option<PathBuf>> {
        if entries.is_empty() {
            debug!("No gallery entries, skipping manifest");
            return Ok(None);
        }

        let manifest = Manifest::new(entries.to_vec());
        let content = manifest.to_json()?;
        let path = Self::manifest_path(output_dir);
        std::fs::write(&path, content)?;
        debug!("Wrote {} entries to {}", entries.len(), path.display());

        Ok(Some(path))
    }
}
