//! # Gallery Image Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per i test di integrazione
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom
//! - `file_manager`: Discovery dei JPEG sorgente e utilità sulle dimensioni
//! - `image_processor`: Decode, resize e re-encode di una singola immagine
//! - `manifest`: Voci della galleria e scrittura di `gallery.json`
//! - `optimizer`: Orchestratore del batch
//! - `progress`: Progress bar e statistiche aggregate
//! - `json_output`: Eventi JSON per uso programmatico
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use gallery_image_optimizer::{Config, GalleryOptimizer};
//!
//! let optimizer = GalleryOptimizer::new(Config::default())?;
//! let summary = optimizer.run()?;
//! println!("{} images", summary.entries.len());
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod json_output;
pub mod manifest;
pub mod optimizer;
pub mod progress;

pub use config::Config;
pub use error::OptimizeError;
pub use image_processor::{ImageProcessor, ImageRecord};
pub use manifest::{GalleryEntry, Manifest, ManifestWriter};
pub use optimizer::{GalleryOptimizer, RunSummary};
