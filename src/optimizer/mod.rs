//! # Optimizer Module
//!
//! Modulo che separa le responsabilità dell'orchestrazione in sottomoduli:
//! - `gallery_optimizer`: Orchestratore principale (scan → optimize → manifest)
//! - `path_resolver`: Logica di calcolo path di output centralizzata

pub mod gallery_optimizer;
pub mod path_resolver;

pub use gallery_optimizer::{BatchResult, GalleryOptimizer, RunSummary};
pub use path_resolver::PathResolver;
