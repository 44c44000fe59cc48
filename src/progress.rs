//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il feedback in console e le statistiche aggregate del run.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Righe di esito per ogni file (✓ dimensioni e riduzione, oppure ✗ Failed)
//! - Tracking statistiche di ottimizzazione (byte originali, byte nuovi, errori)
//! - Riepilogo finale con la riduzione complessiva
//!
//! ## Componenti principali:
//! - `ProgressManager`: Gestisce progress bar e righe di output
//! - `OptimizationStats`: Traccia statistiche cumulative (non persistite)
//!
//! ## Visual feedback:
//! ```text
//! Processing: IMG_001.JPG... ✓ 1920x1280 (2048KB → 412KB, -79.88%)
//! Processing: broken.jpg... ✗ Failed
//! ------------------------------------------------------------
//! Total: 2048KB → 412KB (79.9% reduction)
//! ```

use crate::file_manager::FileManager;
use crate::image_processor::ImageRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const SEPARATOR_WIDTH: usize = 60;

/// Manages progress reporting for a batch run
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
    quiet: bool,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar, quiet: false }
    }

    /// A manager that never draws nor prints (used in JSON mode)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            quiet: true,
        }
    }

    /// Print a line above the bar
    pub fn println(&self, line: &str) {
        if !self.quiet {
            self.bar.suspend(|| println!("{}", line));
        }
    }

    /// Run `f` with the bar cleared, so log lines written to the terminal
    /// do not interleave with it
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    pub fn separator(&self) {
        self.println(&"-".repeat(SEPARATOR_WIDTH));
    }

    /// Report a successfully optimized file and advance the bar
    pub fn file_done(&self, source_name: &str, record: &ImageRecord) {
        self.println(&Self::file_done_line(source_name, record));
        self.update(source_name);
    }

    fn file_done_line(source_name: &str, record: &ImageRecord) -> String {
        format!(
            "Processing: {}... ✓ {} ({} → {}, -{}%)",
            source_name,
            record.dimensions(),
            FileManager::format_kb(record.original_size),
            FileManager::format_kb(record.new_size),
            FileManager::format_percent(record.reduction_percent)
        )
    }

    /// Report a failed file and advance the bar
    pub fn file_failed(&self, source_name: &str) {
        self.println(&format!("Processing: {}... ✗ Failed", source_name));
        self.update(source_name);
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Aggregate statistics for one run
#[derive(Debug, Default, Clone)]
pub struct OptimizationStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_original_size: u64,
    pub total_new_size: u64,
}

impl OptimizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_optimized(&mut self, original_size: u64, new_size: u64) {
        self.files_processed += 1;
        self.total_original_size += original_size;
        self.total_new_size += new_size;
    }

    pub fn add_error(&mut self) {
        self.files_failed += 1;
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.total_original_size, self.total_new_size)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Total: {} → {} ({:.1}% reduction)",
            FileManager::format_kb(self.total_original_size),
            FileManager::format_kb(self.total_new_size),
            self.overall_reduction_percent()
        )
    }
}
