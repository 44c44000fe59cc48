//! # Path Resolution Module
//!
//! Centralizza la logica di calcolo dei path di output.
//! Ogni immagine sorgente `<stem>.<JPG|jpeg|...>` diventa `<output_dir>/<stem>.jpg`.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const OUTPUT_EXTENSION: &str = "jpg";

/// Utility per calcolare i path di output in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Nome del file di output: stem originale + `.jpg` minuscolo
    pub fn output_file_name(input_path: &Path) -> Result<String> {
        let file_stem = input_path
            .file_stem()
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", input_path.display()))?
            .to_string_lossy();

        Ok(format!("{}.{}", file_stem, OUTPUT_EXTENSION))
    }

    /// Calcola il path di output per un file dato
    pub fn get_output_path(input_path: &Path, output_dir: &Path) -> Result<PathBuf> {
        let result = output_dir.join(Self::output_file_name(input_path)?);
        debug!("Resolved output path: {} -> {}", input_path.display(), result.display());
        Ok(result)
    }

    /// Crea la directory di output (e le intermedie) se necessario
    pub fn ensure_output_dir(output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir).map_err(|e| {
            anyhow::anyhow!("Failed to create output directory {}: {}", output_dir.display(), e)
        })
    }
}
