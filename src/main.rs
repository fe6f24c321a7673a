//! Hospimap dashboard server
//!
//! Loads the hospital feed and department boundaries once, then serves the
//! dashboard until interrupted.
//!
//! Run with: cargo run --bin hospimap -- --config config.toml
//!
//! Configuration is read from `--config`, else from the default locations
//! (see `Config::load_default`). `HOSPIMAP_*` environment variables override
//! file values; `RUST_LOG` overrides the configured log level.

use anyhow::Context;
use clap::Parser;
use hospimap::api::{serve, AppState};
use hospimap::config::{Config, LoggingConfig};
use hospimap::dataset::Dataset;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "hospimap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dashboard of French COVID-19 hospital data")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the CSV source (URL or local path)
    #[arg(long)]
    csv: Option<String>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // The configured subscriber depends on the config itself, so config
    // lookup logs through a temporary one
    let mut config = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        match &args.config {
            Some(path) => Config::load_with_env(path)
                .with_context(|| format!("Cannot load config {}", path.display())),
            None => Ok(Config::load_default()),
        }
    })?;
    if let Some(csv) = args.csv {
        config.source.csv_url = csv;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    init_tracing(&config.logging);

    tracing::info!("Starting Hospimap v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("CSV source: {}", config.source.csv_url);
    tracing::info!("Boundary file: {}", config.source.geojson_path);

    // Build the dataset before accepting any request
    let start = Instant::now();
    let dataset = Dataset::load(&config.source)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to build dataset"))
        .context("Startup aborted: hospital data could not be loaded")?;
    tracing::info!("Dataset built in {:?}", start.elapsed());

    let state = AppState::new(Arc::new(dataset), config.api.clone());
    serve(state, &config.api).await?;

    tracing::info!("Hospimap stopped");
    Ok(())
}

fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LoggingConfig::default().filter_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
