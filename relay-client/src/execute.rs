//! Execution-related API endpoints

use std::time::Duration;

use crate::AgentClient;
use crate::error::Result;
use relay_core::dto::execute::{ExecuteRequest, ExecuteResponse};

impl AgentClient {
    /// Execute a command on the agent
    ///
    /// The `deadline` is a call-level bound on the whole HTTP exchange. It
    /// must be longer than `req.timeout_secs` so the agent's own deadline
    /// enforcement fires first and returns a structured `timed_out` result;
    /// if the call-level deadline fires instead, the error surfaces as a
    /// transport failure (`ClientError::is_timeout`).
    ///
    /// # Arguments
    /// * `req` - Command and engine-enforced timeout
    /// * `deadline` - Upper bound on the HTTP call itself
    pub async fn execute(&self, req: &ExecuteRequest, deadline: Duration) -> Result<ExecuteResponse> {
        let url = format!("{}/execute", self.base_url);

        tracing::debug!(command = %req.command, timeout_secs = req.timeout_secs, "dispatching execute request");

        let response = self
            .client
            .post(&url)
            .timeout(deadline)
            .json(req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Check agent liveness
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_empty_response(response).await
    }
}
