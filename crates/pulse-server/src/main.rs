//! Pulse dashboard backend entry point.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `pulse-config.yaml` (or `PULSE_CONFIG`)
//! 3. Build the upstream client and the shared application state
//! 4. Start the `data_update` broadcast loop
//! 5. Serve HTTP and `WebSocket` traffic until the process exits

use std::path::PathBuf;
use std::sync::Arc;

use pulse_core::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};
use pulse_core::{BroadcastSettings, PulseConfig};
use pulse_server::{AppState, ServerConfig, UpstreamClient, start_broadcast, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, client construction, or the
/// server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("pulse-server starting");

    // 2. Load configuration.
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
    let config = PulseConfig::load_or_default(&config_path)?;
    info!(
        host = config.server.host,
        port = config.server.port,
        upstream = config.upstream.base_url,
        upstream_timeout_ms = config.upstream.timeout_ms,
        broadcast_interval_secs = config.broadcast.interval_secs,
        "Configuration loaded"
    );

    // 3. Shared state.
    let upstream = UpstreamClient::new(&config.upstream)?;
    let state = Arc::new(
        AppState::new(upstream).with_lookback_days(config.broadcast.lookback_days),
    );

    // 4. Broadcast loop.
    let _broadcast = start_broadcast(
        Arc::clone(&state),
        BroadcastSettings::from(&config.broadcast),
    );

    // 5. Serve.
    start_server(&ServerConfig::from(&config.server), state).await?;

    Ok(())
}
