//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e pronti per la console
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`, `Image`, `Encoding`, `Json`: errori di libreria convertiti automaticamente
//! - `InvalidQuality`, `InvalidMaxWidth`, `SourceNotFound`: errori di utilizzo,
//!   rilevati prima di qualsiasi scansione
//! - `NoImagesFound`, `NoImagesProcessed`: batch terminato senza risultati
//! - `Validation`: altri errori di validazione input
//!
//! Gli errori per singolo file (`Io`, `Image`) vengono loggati e il file viene
//! saltato; gli altri terminano il processo con exit status non-zero.

use std::path::PathBuf;

/// Custom error types for gallery optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JPEG encoding error: {0}")]
    Encoding(#[from] jpeg_encoder::EncodingError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Quality must be between 1 and 100 (got {0})")]
    InvalidQuality(u32),

    #[error("Max width must be greater than 0")]
    InvalidMaxWidth,

    #[error("Source directory '{}' not found\nCreate it and add your original images there, or specify a different path with --source", .0.display())]
    SourceNotFound(PathBuf),

    #[error("No JPG images found in {}", .0.display())]
    NoImagesFound(PathBuf),

    #[error("No images were processed")]
    NoImagesProcessed,

    #[error("Validation error: {0}")]
    Validation(String),
}
