//! Relay Agent binary entry point

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relay_agent::api::{self, AppState};
use relay_agent::config::Config;
use relay_agent::engine::ExecutionEngine;
use relay_agent::metrics::AgentMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_agent=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Relay Agent");

    let config = Config::from_env();
    config.validate().context("Invalid configuration")?;
    info!(
        "Loaded configuration: bind_addr={}, max_output_bytes={}, max_timeout_secs={}",
        config.bind_addr, config.max_output_bytes, config.max_timeout_secs
    );

    let metrics = AgentMetrics::new().context("Failed to initialize metrics registry")?;
    let engine = Arc::new(ExecutionEngine::new(config.max_output_bytes));

    let state = AppState {
        engine,
        metrics,
        max_timeout_secs: config.max_timeout_secs,
    };

    let app = api::create_router(state);

    info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
