//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di ottimizzazione
//! - Fornisce validazione dei parametri di input prima di ogni elaborazione
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `source_dir`: Directory con le immagini originali (default: `./source_images`)
//! - `output_dir`: Directory per immagini ottimizzate e manifest (default: `../public/images`)
//! - `max_width`: Larghezza massima in pixel (default: 1920)
//! - `jpeg_quality`: Qualità JPEG (1-100, default: 85)
//! - `url_prefix`: Prefisso dei path pubblici nel manifest (default: `/images`)
//! - `json_output`: Eventi JSON su stdout invece della progress bar (default: false)
//!
//! ## Validazione:
//! - Controlla che jpeg_quality sia 1-100
//! - Controlla che max_width sia > 0
//! - Controlla (separatamente) che la directory sorgente esista
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     max_width: 1600,
//!     jpeg_quality: 90,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::error::OptimizeError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_DIR: &str = "./source_images";
pub const DEFAULT_OUTPUT_DIR: &str = "../public/images";
pub const DEFAULT_MAX_WIDTH: u32 = 1920;
pub const DEFAULT_JPEG_QUALITY: u32 = 85;
pub const DEFAULT_URL_PREFIX: &str = "/images";

/// Configuration for a gallery optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for source JPEG files
    pub source_dir: PathBuf,
    /// Directory receiving optimized images and gallery.json
    pub output_dir: PathBuf,
    /// Images wider than this are scaled down (pixels)
    pub max_width: u32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u32,
    /// Public URL prefix for manifest paths
    pub url_prefix: String,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_width: DEFAULT_MAX_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(OptimizeError::InvalidQuality(self.jpeg_quality).into());
        }

        if self.max_width == 0 {
            return Err(OptimizeError::InvalidMaxWidth.into());
        }

        Ok(())
    }

    /// Check that the source directory exists
    pub fn validate_source(&self) -> Result<()> {
        if !self.source_dir.exists() {
            return Err(OptimizeError::SourceNotFound(self.source_dir.clone()).into());
        }
        if !self.source_dir.is_dir() {
            return Err(OptimizeError::Validation(format!(
                "Source path is not a directory: {}",
                self.source_dir.display()
            ))
            .into());
        }
        Ok(())
    }

    /// Load configuration from file.
    ///
    /// The file must exist. Values are not validated here: command-line
    /// overrides are applied on top first, then the merged config is checked.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.jpeg_quality = 0;
        assert!(config.validate().is_err());

        config.jpeg_quality = 150;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OptimizeError>(),
            Some(OptimizeError::InvalidQuality(150))
        ));

        config.jpeg_quality = 100;
        assert!(config.validate().is_ok());

        config.max_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.source_dir, PathBuf::from("./source_images"));
        assert_eq!(config.output_dir, PathBuf::from("../public/images"));
        assert_eq!(config.max_width, 1920);
        assert_eq!(config.jpeg_quality, 85);
        assert_eq!(config.url_prefix, "/images");
        assert!(!config.json_output);
    }

    #[test]
    fn test_validate_source() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config {
            source_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(config.validate_source().is_ok());

        config.source_dir = temp_dir.path().join("missing");
        let err = config.validate_source().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OptimizeError>(),
            Some(OptimizeError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = Config {
            source_dir: PathBuf::from("originals"),
            output_dir: PathBuf::from("public/images"),
            max_width: 1600,
            jpeg_quality: 90,
            url_prefix: "/media".to_string(),
            json_output: true,
        };

        original_config.save_to_file(&config_path).unwrap();
        let loaded_config = Config::from_file(&config_path).unwrap();

        assert_eq!(loaded_config.source_dir, PathBuf::from("originals"));
        assert_eq!(loaded_config.output_dir, PathBuf::from("public/images"));
        assert_eq!(loaded_config.max_width, 1600);
        assert_eq!(loaded_config.jpeg_quality, 90);
        assert_eq!(loaded_config.url_prefix, "/media");
        assert!(loaded_config.json_output);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, r#"{ "max_width": 1200 }"#).unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.max_width, 1200);
        assert_eq!(config.jpeg_quality, 85);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::from_file(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_out_of_range_values_load_and_fail_validation_later() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, r#"{ "jpeg_quality": 0 }"#).unwrap();

        let mut config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.jpeg_quality, 0);
        assert!(config.validate().is_err());

        config.jpeg_quality = 80;
        assert!(config.validate().is_ok());
    }
}
