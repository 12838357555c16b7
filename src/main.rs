//! Watchpost - Status Page Generator
//!
//! Probes the configured sites once, folds the results into per-site
//! history, and keeps incident records in sync with site health. Meant to
//! be invoked on a fixed cadence by an external scheduler.

mod config;
mod incident;
mod metrics;
mod probe;
mod runner;
mod store;

use config::{Config, Settings};
use incident::IncidentEngine;
use runner::Runner;
use store::{HistoryStore, IncidentStore};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("watchpost=info".parse()?))
        .init();

    // Load configuration
    let settings = Settings::load();
    let config = Config::from_file(&settings.config_path)?;
    tracing::info!("Checking {} sites from {}", config.sites.len(), settings.config_path.display());

    // Initialize stores
    let history = HistoryStore::new(&settings.history_dir)?;
    let incidents = IncidentStore::new(&settings.history_dir)?;
    let engine = IncidentEngine::new(incidents);

    // Run one full cycle
    let runner = Runner::new(settings, config, history, engine);
    let summary = runner.run().await?;

    tracing::info!("Overall status: {}", summary.overall);
    Ok(())
}
