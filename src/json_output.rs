//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON (una riga per evento)
//! per pipeline di build che vogliono consumare il progresso in modo programmatico.
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del batch (directory, numero di file, configurazione)
//! - `file_complete`: Fine elaborazione di un file (successo o errore)
//! - `complete`: Fine processo con statistiche finali e path del manifest
//! - `error`: Errore fatale

use crate::config::Config;
use crate::image_processor::ImageRecord;
use crate::progress::OptimizationStats;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Inizio del batch
    #[serde(rename = "start")]
    Start {
        source_dir: PathBuf,
        output_dir: PathBuf,
        total_files: usize,
        config: JsonConfig,
    },

    /// Fine elaborazione di un file specifico
    #[serde(rename = "file_complete")]
    FileComplete {
        path: PathBuf,
        filename: Option<String>,
        original_size: u64,
        new_size: u64,
        reduction_percent: f64,
        dimensions: Option<String>,
        error: Option<String>,
    },

    /// Processo completato
    #[serde(rename = "complete")]
    Complete {
        files_processed: usize,
        files_failed: usize,
        total_original_size: u64,
        total_new_size: u64,
        total_reduction_percent: f64,
        manifest_path: Option<PathBuf>,
        duration_seconds: f64,
    },

    /// Errore generale
    #[serde(rename = "error")]
    Error { message: String },
}

/// Configurazione per output JSON
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonConfig {
    pub max_width: u32,
    pub jpeg_quality: u32,
    pub url_prefix: String,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(config: &Config, total_files: usize) -> Self {
        Self::Start {
            source_dir: config.source_dir.clone(),
            output_dir: config.output_dir.clone(),
            total_files,
            config: JsonConfig::from(config),
        }
    }

    /// Crea un messaggio di completamento file riuscito
    pub fn file_optimized(path: PathBuf, record: &ImageRecord) -> Self {
        Self::FileComplete {
            path,
            filename: Some(record.filename.clone()),
            original_size: record.original_size,
            new_size: record.new_size,
            reduction_percent: record.reduction_percent,
            dimensions: Some(record.dimensions()),
            error: None,
        }
    }

    /// Crea un messaggio di completamento file fallito
    pub fn file_failed(path: PathBuf, error: String) -> Self {
        Self::FileComplete {
            path,
            filename: None,
            original_size: 0,
            new_size: 0,
            reduction_percent: 0.0,
            dimensions: None,
            error: Some(error),
        }
    }

    pub fn complete(
        stats: &OptimizationStats,
        manifest_path: Option<PathBuf>,
        duration_seconds: f64,
    ) -> Self {
        Self::Complete {
            files_processed: stats.files_processed,
            files_failed: stats.files_failed,
            total_original_size: stats.total_original_size,
            total_new_size: stats.total_new_size,
            total_reduction_percent: stats.overall_reduction_percent(),
            manifest_path,
            duration_seconds,
        }
    }

    pub fn error(message: String) -> Self {
        Self::Error { message }
    }
}

impl From<&Config> for JsonConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_width: config.max_width,
            jpeg_quality: config.jpeg_quality,
            url_prefix: config.url_prefix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_tagged() {
        let record = ImageRecord {
            filename: "a.jpg".to_string(),
            original_size: 100,
            new_size: 40,
            reduction_percent: 60.0,
            width: 1920,
            height: 1280,
        };
        let value = serde_json::to_value(JsonMessage::file_optimized(PathBuf::from("src/a.JPG"), &record)).unwrap();
        assert_eq!(value["type"], "file_complete");
        assert_eq!(value["dimensions"], "1920x1280");
        assert!(value["error"].is_null());

        let value = serde_json::to_value(JsonMessage::error("boom".to_string())).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["message"], "boom");
    }

    #[test]
    fn test_start_carries_config() {
        let config = Config::default();
        let value = serde_json::to_value(JsonMessage::start(&config, 3)).unwrap();
        assert_eq!(value["type"], "start");
        assert_eq!(value["total_files"], 3);
        assert_eq!(value["config"]["max_width"], 1920);
        assert_eq!(value["config"]["jpeg_quality"], 85);
    }
}
