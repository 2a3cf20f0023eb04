//! rota-console server entry point.
//!
//! Starts the Axum HTTP server with the gated dashboard, share links and
//! the selection WebSocket.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use rota_console::api;
use rota_console::app_state::AppState;
use rota_console::backend::HttpBackend;
use rota_console::config::{ConsoleConfig, LogFormat};
use rota_console::storage::FileKeyValue;

/// How often expired sessions and idle profile contexts are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConsoleConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, backend = %config.backend_url, "starting rota-console");

    // Ports
    let backend = HttpBackend::new(config.backend_url.clone(), config.backend_timeout)
        .context("failed to build backend client")?;
    let storage = FileKeyValue::new(config.storage_dir.clone());
    tracing::info!(dir = %config.storage_dir.display(), "profile storage ready");

    // Build application state
    let app_state = AppState::build(&config, Arc::new(backend), Arc::new(storage));
    spawn_sweeper(app_state.clone());

    // Build router
    let app = api::build_router(&app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_sweeper(state: AppState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = state.session_service.table().purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "expired sessions swept");
            }
            let evicted = state
                .console_service
                .contexts()
                .evict_idle(chrono::Utc::now());
            if evicted > 0 {
                tracing::debug!(evicted, "idle profile contexts evicted");
            }
        }
    });
}
