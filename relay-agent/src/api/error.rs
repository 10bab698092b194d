//! API Error Handling
//!
//! Unified error types and conversion for API responses. Error bodies carry
//! a machine-readable `kind` so the dispatcher can classify failures without
//! string matching.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Rejected before anything was executed
    InvalidRequest(String),
    /// The engine could not start the process
    SpawnError(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg),
            ApiError::SpawnError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "spawn_error", msg),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg)
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": message, "kind": kind })),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
