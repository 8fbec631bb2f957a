use terra_backend::config::{self, ConfigOrigin};
use terra_backend::module::flight::OpenSkyClient;
use terra_backend::module::quake::UsgsClient;
use terra_backend::module::sat::CelestrakClient;
use terra_backend::module::scheduled::{RefreshOrchestrator, Sources};
use terra_backend::module::state::{ChangeKind, StateStore};
use terra_backend::module::weather::RainViewerClient;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config path as the only argument
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let (config, origin) = config::read_config(&config_path)?;

    let _logging_guard = terra_backend::logging::init_logging(&config.log_dir, "terra-backend", &config.log_level)?;

    tracing::info!("Terra backend starting...");
    match origin {
        ConfigOrigin::File => tracing::info!("Loaded config from {}", config_path),
        ConfigOrigin::Defaults => tracing::warn!("Config file {} not found, using defaults", config_path),
    }
    tracing::info!("Active layers: {:?}", config.active_layers);

    let timeout = config.request_timeout();
    let endpoints = &config.endpoints;
    let feeds = &config.feeds;

    let flights = OpenSkyClient::new(
        endpoints.opensky.as_str(),
        Duration::from_secs(feeds.flight_min_interval_secs),
        timeout,
    )
    .context("Failed to create OpenSky client")?;
    let satellites = CelestrakClient::new(endpoints.celestrak.as_str(), feeds.satellite_groups.clone(), timeout)
        .context("Failed to create CelesTrak client")?;
    let earthquakes = UsgsClient::new(
        endpoints.usgs_summary.as_str(),
        endpoints.usgs_query.as_str(),
        feeds.seismic_feed,
        timeout,
    )
    .context("Failed to create USGS client")?;
    let weather = RainViewerClient::new(
        endpoints.rainviewer.as_str(),
        Duration::from_secs(feeds.weather_cache_secs),
        timeout,
    )
    .context("Failed to create RainViewer client")?;

    let sources = Sources::new(
        Arc::new(flights),
        Arc::new(satellites),
        Arc::new(earthquakes),
        Arc::new(weather),
    );
    let store = Arc::new(StateStore::new(config.active_layers.iter().copied()));

    let summary_task = tokio::spawn(log_state_changes(store.clone()));

    let mut orchestrator = RefreshOrchestrator::new(store, sources, config.refresh_intervals());
    orchestrator.start().await;
    tracing::info!("Refresh orchestrator running, press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    tracing::info!("Shutdown signal received");
    orchestrator.stop();
    summary_task.abort();

    tracing::info!("Terra backend stopped");
    Ok(())
}

/// Log a one-line summary per finished refresh
async fn log_state_changes(store: Arc<StateStore>) {
    let mut rx = store.subscribe();

    loop {
        match rx.recv().await {
            Ok(change) => {
                if !matches!(change.kind, ChangeKind::Updated | ChangeKind::Failed) {
                    continue;
                }
                let status = store.status(change.layer);
                match status.last_error {
                    Some(error) => tracing::warn!("[{}] refresh failed: {}", change.layer, error),
                    None => tracing::info!(
                        "[{}] {} records, updated {}",
                        change.layer,
                        status.records,
                        status
                            .last_update
                            .map(|t| t.format("%H:%M:%S UTC").to_string())
                            .unwrap_or_else(|| "never".to_string())
                    ),
                }
            }
            Err(RecvError::Lagged(n)) => tracing::debug!("State log skipped {} changes", n),
            Err(RecvError::Closed) => break,
        }
    }
}
