//! Relay Coordinator binary entry point

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relay_client::AgentClient;
use relay_coordinator::api::{self, AppState};
use relay_coordinator::config::Config;
use relay_coordinator::dispatcher::Dispatcher;
use relay_coordinator::metrics::CoordinatorMetrics;
use relay_coordinator::store::JobStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_coordinator=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Relay Coordinator");

    let config = Arc::new(Config::from_env());
    config.validate().context("Invalid configuration")?;
    info!(
        "Loaded configuration: bind_addr={}, agent_url={}, max_parallel_dispatches={}",
        config.bind_addr, config.agent_url, config.max_parallel_dispatches
    );

    let store = Arc::new(JobStore::new());
    let client = Arc::new(AgentClient::new(config.agent_url.clone()));
    let metrics = CoordinatorMetrics::new().context("Failed to initialize metrics registry")?;
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&store),
        client,
        metrics.clone(),
        &config,
    ));

    let state = AppState {
        store,
        dispatcher,
        metrics,
        config: Arc::clone(&config),
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
