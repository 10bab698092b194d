//! API Module
//!
//! HTTP API layer for the agent.
//! Each submodule handles one endpoint group.

pub mod error;
pub mod execute;
pub mod health;
pub mod metrics;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::engine::ExecutionEngine;
use crate::metrics::AgentMetrics;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ExecutionEngine>,
    pub metrics: AgentMetrics,
    pub max_timeout_secs: u64,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::get_metrics))
        .route("/execute", post(execute::execute))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
