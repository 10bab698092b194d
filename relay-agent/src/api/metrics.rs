//! Metrics API Handler

use axum::{extract::State, http::StatusCode};

use crate::api::AppState;

/// GET /metrics
/// Prometheus text exposition of the execution counters
pub async fn get_metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    match state.metrics.gather() {
        Ok(metrics) => Ok(metrics),
        Err(e) => {
            tracing::error!("Failed to gather metrics: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
