//! Relay Agent HTTP Client
//!
//! A simple, type-safe HTTP client for the Relay execution agent API.
//!
//! The coordinator's dispatcher uses this crate to hand commands to an agent
//! and to read back structured execution results, keeping the wire handling
//! in one place.
//!
//! # Example
//!
//! ```no_run
//! use relay_client::AgentClient;
//! use relay_core::dto::execute::ExecuteRequest;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), relay_client::ClientError> {
//!     let client = AgentClient::new("http://localhost:8080");
//!
//!     let result = client
//!         .execute(
//!             &ExecuteRequest {
//!                 command: "echo hi".to_string(),
//!                 timeout_secs: 30,
//!             },
//!             Duration::from_secs(35),
//!         )
//!         .await?;
//!
//!     println!("exit code: {}", result.exit_code);
//!     Ok(())
//! }
//! ```

pub mod error;
mod execute;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Shape of the agent's structured error bodies
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    kind: Option<String>,
}

/// HTTP client for the Relay agent API
#[derive(Debug, Clone)]
pub struct AgentClient {
    /// Base URL of the agent (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl AgentClient {
    /// Create a new agent client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the agent API (e.g., "http://localhost:8080")
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new agent client with a custom HTTP client
    ///
    /// This allows configuring connect timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the agent
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and converts structured error bodies
    /// (`{"error": ..., "kind": ...}`) into `ClientError::Api`, or
    /// deserializes the body if the request succeeded.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => ClientError::api_error(status.as_u16(), body.kind, body.error),
                Err(_) => ClientError::api_error(status.as_u16(), None, text),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is irrelevant (e.g., health checks)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => ClientError::api_error(status.as_u16(), body.kind, body.error),
                Err(_) => ClientError::api_error(status.as_u16(), None, text),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AgentClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = AgentClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = AgentClient::with_client("http://localhost:8080", http_client);
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_error_body_parses_kind() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "boom", "kind": "spawn_error"}"#).unwrap();
        assert_eq!(body.error, "boom");
        assert_eq!(body.kind.as_deref(), Some("spawn_error"));
    }

    #[test]
    fn test_error_body_kind_optional() {
        let body: ErrorBody = serde_json::from_str(r#"{"error": "boom"}"#).unwrap();
        assert!(body.kind.is_none());
    }
}
