//! Execute API Handler
//!
//! HTTP endpoint wrapping the execution engine. Validation happens here,
//! before anything is spawned; the engine only ever sees accepted requests.

use std::time::Duration;

use axum::{Json, extract::State};
use relay_core::dto::execute::{ExecuteRequest, ExecuteResponse};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::engine::EngineError;

/// POST /execute
/// Run one command under the requested deadline and return its structured result
///
/// Non-zero exits and deadline kills are normal 200 responses; only requests
/// rejected up front (400) and processes that never started (422) are errors.
pub async fn execute(
    State(state): State<AppState>,
    Json(req): Json<ExecuteRequest>,
) -> ApiResult<Json<ExecuteResponse>> {
    if req.command.trim().is_empty() {
        return Err(ApiError::InvalidRequest("command cannot be empty".to_string()));
    }

    if req.timeout_secs == 0 || req.timeout_secs > state.max_timeout_secs {
        return Err(ApiError::InvalidRequest(format!(
            "timeout_secs must be between 1 and {}",
            state.max_timeout_secs
        )));
    }

    tracing::info!(command = %req.command, timeout_secs = req.timeout_secs, "executing command");

    let result = state
        .engine
        .run(&req.command, Duration::from_secs(req.timeout_secs))
        .await
        .map_err(|e| match e {
            EngineError::Spawn(err) => {
                state.metrics.record_spawn_failure();
                ApiError::SpawnError(format!("could not start process: {}", err))
            }
            EngineError::Wait(err) => {
                state.metrics.record_spawn_failure();
                ApiError::InternalError(format!("failed waiting for process: {}", err))
            }
        })?;

    state.metrics.record(&result);

    tracing::info!(
        exit_code = result.exit_code,
        runtime_ms = result.runtime_ms,
        timed_out = result.timed_out,
        "command execution finished"
    );

    Ok(Json(result.into()))
}
