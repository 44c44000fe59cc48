//! # Gallery Optimizer Main Orchestrator
//!
//! Orchestratore principale: scansione della directory sorgente, ottimizzazione
//! sequenziale dei file in ordine di nome, scrittura del manifest.
//!
//! Un file che fallisce viene loggato e saltato; non influenza gli altri.

use crate::{
    config::Config,
    error::OptimizeError,
    file_manager::FileManager,
    image_processor::{ImageProcessor, ImageRecord},
    json_output::JsonMessage,
    manifest::{GalleryEntry, ManifestWriter},
    optimizer::path_resolver::PathResolver,
    progress::{OptimizationStats, ProgressManager},
};
use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Outcome of processing the source directory
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Number of JPEG files found by the scan
    pub files_found: usize,
    /// Entries for successfully processed files, in processing order
    pub entries: Vec<GalleryEntry>,
    pub stats: OptimizationStats,
}

/// Outcome of a complete run, manifest included
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub entries: Vec<GalleryEntry>,
    pub stats: OptimizationStats,
    pub manifest_path: PathBuf,
}

/// Orchestratore del batch
pub struct GalleryOptimizer {
    config: Config,
    processor: ImageProcessor,
}

impl GalleryOptimizer {
    /// Crea nuova istanza dell'ottimizzatore
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let quality = u8::try_from(config.jpeg_quality)
            .map_err(|_| OptimizeError::InvalidQuality(config.jpeg_quality))?;
        let processor = ImageProcessor::new(config.max_width, quality);

        Ok(Self { config, processor })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Esegue scansione, ottimizzazione e scrittura del manifest.
    ///
    /// Fails with `NoImagesFound` when the scan is empty and with
    /// `NoImagesProcessed` when every file failed; no manifest is written in
    /// either case.
    pub fn run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        self.config.validate_source()?;

        let batch = self.process_directory()?;

        if batch.files_found == 0 {
            return Err(OptimizeError::NoImagesFound(self.config.source_dir.clone()).into());
        }

        let manifest_path = ManifestWriter::write(&batch.entries, &self.config.output_dir)?;

        if self.config.json_output {
            JsonMessage::complete(
                &batch.stats,
                manifest_path.clone(),
                start_time.elapsed().as_secs_f64(),
            )
            .emit();
        }

        match manifest_path {
            Some(manifest_path) => {
                info!(
                    "Processed {} images in {:.2}s",
                    batch.stats.files_processed,
                    start_time.elapsed().as_secs_f64()
                );
                Ok(RunSummary {
                    entries: batch.entries,
                    stats: batch.stats,
                    manifest_path,
                })
            }
            None => Err(OptimizeError::NoImagesProcessed.into()),
        }
    }

    /// Processa tutti i JPEG della directory sorgente, in ordine di nome.
    ///
    /// Creates the output directory first; a failure there is fatal.
    pub fn process_directory(&self) -> Result<BatchResult> {
        PathResolver::ensure_output_dir(&self.config.output_dir)?;

        let files = FileManager::find_jpeg_files(&self.config.source_dir)?;
        if files.is_empty() {
            info!("No JPG images found in {}", self.config.source_dir.display());
            return Ok(BatchResult::default());
        }

        let progress = self.start_progress(&files);

        let mut result = BatchResult {
            files_found: files.len(),
            ..Default::default()
        };
        let mut seen_outputs = HashSet::new();

        for file_path in &files {
            let source_name = file_path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();

            match self.process_file(file_path, &mut seen_outputs, &progress) {
                Ok(record) => {
                    result.stats.add_optimized(record.original_size, record.new_size);
                    let entry = GalleryEntry::new(
                        &record,
                        result.entries.len() + 1,
                        &self.config.url_prefix,
                    );
                    result.entries.push(entry);

                    if self.config.json_output {
                        JsonMessage::file_optimized(file_path.clone(), &record).emit();
                    }
                    progress.file_done(&source_name, &record);
                }
                Err(e) => {
                    result.stats.add_error();
                    progress.suspend(|| error!("Error processing {}: {}", file_path.display(), e));

                    if self.config.json_output {
                        JsonMessage::file_failed(file_path.clone(), e.to_string()).emit();
                    }
                    progress.file_failed(&source_name);
                }
            }
        }

        progress.finish();
        progress.separator();
        progress.println(&result.stats.format_summary());

        Ok(result)
    }

    /// Ottimizza un singolo file nella directory di output
    fn process_file(
        &self,
        file_path: &Path,
        seen_outputs: &mut HashSet<PathBuf>,
        progress: &ProgressManager,
    ) -> Result<ImageRecord> {
        let output_path = PathResolver::get_output_path(file_path, &self.config.output_dir)?;
        if !seen_outputs.insert(output_path.clone()) {
            progress.suspend(|| {
                warn!(
                    "{} maps to {} which was already written by an earlier file; it will be overwritten",
                    file_path.display(),
                    output_path.display()
                )
            });
        }

        debug!("Optimizing {} -> {}", file_path.display(), output_path.display());

        Ok(self.processor.optimize(file_path, &output_path)?)
    }

    fn start_progress(&self, files: &[PathBuf]) -> ProgressManager {
        if self.config.json_output {
            JsonMessage::start(&self.config, files.len()).emit();
            return ProgressManager::hidden();
        }

        let progress = ProgressManager::new(files.len() as u64);
        progress.println(&format!("Found {} images to process", files.len()));
        progress.println(&format!(
            "Max width: {}px, Quality: {}%",
            self.processor.max_width(),
            self.processor.quality()
        ));
        progress.separator();
        progress
    }
}
