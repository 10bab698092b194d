//! Error types for the Relay agent client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling the agent
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived (connect error,
    /// connection reset, or the call-level deadline firing)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The agent returned a structured error status
    #[error("agent error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Machine-readable error category from the response body, if present
        kind: Option<String>,
        /// Error message from the agent
        message: String,
    },

    /// Failed to parse the response body
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create an API error from status code, optional kind, and message
    pub fn api_error(status: u16, kind: Option<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            kind,
            message: message.into(),
        }
    }

    /// Whether the request died on the call-level deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestFailed(e) if e.is_timeout())
    }

    /// Whether the agent reported it could not start the process
    pub fn is_spawn_error(&self) -> bool {
        matches!(self, Self::Api { kind: Some(k), .. } if k == "spawn_error")
    }

    /// Whether the agent rejected the request before executing anything
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::Api { kind: Some(k), .. } if k == "invalid_request")
    }
}
