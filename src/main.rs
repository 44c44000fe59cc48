//! # Gallery Image Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Validazione degli input dell'utente (qualità, directory sorgente)
//! - Creazione della configurazione e avvio dell'optimizer
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (source, output, max-width, quality, etc.)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose, o `RUST_LOG`)
//! 3. Carica l'eventuale file di configurazione e applica gli override CLI
//! 4. Valida la qualità e l'esistenza della directory sorgente
//! 5. Ottimizza le immagini e scrive `gallery.json`
//!
//! ## Esempio di utilizzo:
//! ```bash
//! optimize-images --source ./originals --output ../public/images --max-width 1600 --quality 90
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gallery_image_optimizer::{json_output::JsonMessage, Config, GalleryOptimizer};

#[derive(Parser)]
#[command(name = "optimize-images")]
#[command(about = "Optimize JPG images for web gallery")]
struct Args {
    /// Source directory containing original images (default: ./source_images)
    #[arg(long)]
    source: Option<PathBuf>,

    /// Output directory for optimized images (default: ../public/images)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Maximum width in pixels (default: 1920)
    #[arg(long)]
    max_width: Option<u32>,

    /// JPEG quality 1-100 (default: 85)
    #[arg(long)]
    quality: Option<u32>,

    /// Public URL prefix used for manifest paths (default: /images)
    #[arg(long)]
    url_prefix: Option<String>,

    /// JSON configuration file; explicit flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit progress as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match self.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(source) = self.source {
            config.source_dir = source;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(max_width) = self.max_width {
            config.max_width = max_width;
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = quality;
        }
        if let Some(url_prefix) = self.url_prefix {
            config.url_prefix = url_prefix;
        }
        if self.json {
            config.json_output = true;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let json_output = args.json;
    let result = run(args);

    if let Err(ref e) = result {
        if json_output {
            JsonMessage::error(e.to_string()).emit();
        }
    }

    result
}

fn run(args: Args) -> Result<()> {
    let config = args.into_config()?;

    // Validate arguments before touching the filesystem
    config.validate()?;
    config.validate_source()?;
    debug!("Configuration: {:?}", config);

    if !config.json_output {
        println!("Source: {}", config.source_dir.display());
        println!("Output: {}", config.output_dir.display());
        println!();
    }

    let optimizer = GalleryOptimizer::new(config)?;
    let summary = optimizer.run()?;

    if !optimizer.config().json_output {
        println!("\nGallery metadata saved to: {}", summary.manifest_path.display());
        println!("\n✓ Successfully processed {} images", summary.entries.len());
    }

    Ok(())
}
