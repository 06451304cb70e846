//! Bucket Viewer - Browsable HTML listings for S3 buckets
//!
//! Serves the contents of a bucket as folder-style web pages.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bucket_viewer::api::{derive_base_url, HttpServer};
use bucket_viewer::config::{sample_config, ConfigSource, ViewerConfig};
use bucket_viewer::error::Result;
use bucket_viewer::storage::S3Lister;

/// Bucket Viewer - Browsable HTML listings for S3 buckets
#[derive(Parser)]
#[command(name = "bucket-viewer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "bucket-viewer.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve bucket listings over HTTP
    Serve {
        /// Address to listen on (overrides server.bind_address)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "bucket-viewer.toml")]
        output: PathBuf,

        /// Bucket to list
        #[arg(long, default_value = "my-bucket")]
        bucket: String,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = ViewerConfig::load(&cli.config);

    let level = cli
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().ok().map(|(c, _)| c.logging.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    init_logging(&level);

    let config = loaded.map(|(config, source)| {
        match source {
            ConfigSource::File(path) => tracing::debug!("Loaded configuration from {:?}", path),
            ConfigSource::Defaults => tracing::info!(
                "No config file at {:?}, using defaults and environment",
                cli.config
            ),
        }
        config
    });

    match cli.command {
        Commands::Serve { bind } => run_serve(cli.config, config, bind).await,
        Commands::Init { output, bucket } => run_init(output, bucket),
        Commands::Validate => run_validate(cli.config, config),
    }
}

/// Initialize logging
fn init_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Serve listings until the server stops
async fn run_serve(
    config_path: PathBuf,
    config: Result<ViewerConfig>,
    bind: Option<String>,
) -> Result<()> {
    tracing::info!("Starting bucket viewer...");

    let mut config = match config {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load configuration from {:?}: {}", config_path, e);
            return Err(e);
        }
    };

    if let Some(bind) = bind {
        config.server.bind_address = bind;
    }

    let lister = S3Lister::connect(&config.storage).await;
    tracing::info!(
        "Listing bucket {} with file links at {}",
        lister.bucket(),
        derive_base_url(&config)
    );

    let server = HttpServer::new(&config, Arc::new(lister));
    if let Err(e) = server.start().await {
        tracing::error!("HTTP server stopped: {}", e);
        return Err(e);
    }

    Ok(())
}

fn run_init(output: PathBuf, bucket: String) -> Result<()> {
    std::fs::write(&output, sample_config(&bucket))?;
    println!("Configuration file created: {}", output.display());
    println!("\nEdit the file to configure your bucket and link settings.");
    println!("Then start with: bucket-viewer --config {} serve", output.display());

    Ok(())
}

fn run_validate(config_path: PathBuf, config: Result<ViewerConfig>) -> Result<()> {
    match config {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!("  Config File: {}", config_path.display());
            println!("  Bucket: {}", config.bucket());
            println!("  Region: {}", config.storage.region.as_deref().unwrap_or("(default)"));
            println!("  Endpoint: {}", config.storage.endpoint.as_deref().unwrap_or("(default)"));
            println!("  File Links: {}", derive_base_url(&config));
            println!("  Listen: {}{}", config.server.bind_address, config.server.mount_path);
            println!("\nEffective configuration:\n{}", config.to_toml()?);
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            Err(e)
        }
    }
}
