//! fabdash devserver
//!
//! Stand-in REST backend for the fabdash admin client:
//! 1. Serves the login surface (`POST /api/auth/login`) with the demo
//!    account and the http-only session cookie
//! 2. Serves the token refresh endpoint (`POST /auth/refresh`)
//! 3. Serves a sample protected resource (`GET /api/orders`) that answers
//!    401 for missing or stale bearer tokens
//!
//! Tokens are unsigned and validity is tracked in memory — this binary
//! exists for local development and end-to-end tests, not deployment.

mod config;
mod metrics;
mod mint;
mod routes;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("starting fabdash-devserver");

    // Install the Prometheus recorder before any metrics are emitted
    let prometheus_handle = metrics::install_recorder();

    // CLI: simple --config flag parsing
    let args: Vec<String> = std::env::args().collect();
    let cli_config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());

    let config_path = Config::resolve_path(cli_config_path);
    info!(path = %config_path.display(), "loading configuration");
    let config = Config::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let state = AppState::new(config.production, prometheus_handle);
    let app = routes::router(state)
        .layer(tower::limit::ConcurrencyLimitLayer::new(config.max_connections));

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, production = config.production, "devserver listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
