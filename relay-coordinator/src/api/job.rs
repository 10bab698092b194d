//! Job API Handlers
//!
//! HTTP endpoints for job submission and status queries. Submission returns
//! immediately with the pending record; execution happens in the background
//! and is observed by polling.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use relay_core::domain::job::Job;
use relay_core::dto::job::{SubmitJobRequest, SubmitJobResponse};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// POST /jobs
/// Validate, create the pending record, and hand it to the dispatcher
pub async fn submit_job(
    State(state): State<AppState>,
    Json(req): Json<SubmitJobRequest>,
) -> ApiResult<(StatusCode, Json<SubmitJobResponse>)> {
    if req.command.trim().is_empty() {
        return Err(ApiError::BadRequest("command cannot be empty".to_string()));
    }

    let timeout_secs = req.timeout_secs.unwrap_or(state.config.default_timeout_secs);
    if timeout_secs == 0 || timeout_secs > state.config.max_timeout_secs {
        return Err(ApiError::BadRequest(format!(
            "timeout_secs must be between 1 and {}",
            state.config.max_timeout_secs
        )));
    }

    let job = state.store.create(req.command, timeout_secs).await;
    state.metrics.record_submitted();

    tracing::info!(job_id = %job.id, command = %job.command, "job submitted");

    state.dispatcher.spawn(job.id);

    Ok((
        StatusCode::CREATED,
        Json(SubmitJobResponse {
            job_id: job.id,
            status: job.status,
            created_at: job.created_at,
        }),
    ))
}

/// GET /jobs/{id}
/// Full current record; a malformed id is indistinguishable from an unknown one
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Job>> {
    tracing::debug!("Getting job: {}", id);

    let parsed = Uuid::parse_str(&id)
        .map_err(|_| ApiError::NotFound(format!("Job {} not found", id)))?;

    let job = state
        .store
        .get(parsed)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", id)))?;

    Ok(Json(job))
}

/// GET /jobs
/// List all job records, oldest first
pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<Job>>> {
    tracing::debug!("Listing all jobs");

    Ok(Json(state.store.list().await))
}
