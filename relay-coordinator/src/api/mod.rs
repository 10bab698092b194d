//! API Module
//!
//! HTTP API layer for the coordinator.
//! Each submodule handles one endpoint group.

pub mod error;
pub mod health;
pub mod job;
pub mod metrics;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::metrics::CoordinatorMetrics;
use crate::store::JobStore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JobStore>,
    pub dispatcher: Arc<Dispatcher>,
    pub metrics: CoordinatorMetrics,
    pub config: Arc<Config>,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::get_metrics))
        .route("/jobs", post(job::submit_job).get(job::list_jobs))
        .route("/jobs/{id}", get(job::get_job))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
