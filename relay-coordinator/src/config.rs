//! Coordinator configuration
//!
//! Defines all configurable parameters for the coordinator: bind address,
//! agent endpoint, the accepted timeout range, and the dispatch limits.

use std::time::Duration;

/// Coordinator configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Agent base URL (e.g., "http://localhost:8080")
    pub agent_url: String,

    /// Timeout applied when a submission omits one
    pub default_timeout_secs: u64,

    /// Upper bound on the per-job timeout a submission may ask for
    pub max_timeout_secs: u64,

    /// Admission cap on concurrently dispatched jobs
    pub max_parallel_dispatches: usize,

    /// Extra margin added to the job timeout for the agent call, so the
    /// agent's own deadline enforcement fires first
    pub dispatch_margin: Duration,
}

impl Config {
    /// Creates configuration from environment variables with fallback to defaults
    ///
    /// Recognized environment variables:
    /// - COORDINATOR_BIND_ADDR (default: 0.0.0.0:8000)
    /// - AGENT_URL (default: http://localhost:8080)
    /// - DEFAULT_TIMEOUT_SECS (default: 30)
    /// - MAX_TIMEOUT_SECS (default: 300)
    /// - MAX_PARALLEL_DISPATCHES (default: 8)
    /// - DISPATCH_MARGIN_SECS (default: 5)
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("COORDINATOR_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let agent_url =
            std::env::var("AGENT_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

        let default_timeout_secs = std::env::var("DEFAULT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let max_timeout_secs = std::env::var("MAX_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(300);

        let max_parallel_dispatches = std::env::var("MAX_PARALLEL_DISPATCHES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(8);

        let dispatch_margin = std::env::var("DISPATCH_MARGIN_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(5));

        Self {
            bind_addr,
            agent_url,
            default_timeout_secs,
            max_timeout_secs,
            max_parallel_dispatches,
            dispatch_margin,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.agent_url.is_empty() {
            anyhow::bail!("agent_url cannot be empty");
        }

        if self.default_timeout_secs == 0 || self.default_timeout_secs > self.max_timeout_secs {
            anyhow::bail!(
                "default_timeout_secs must be between 1 and max_timeout_secs ({})",
                self.max_timeout_secs
            );
        }

        if self.max_timeout_secs == 0 {
            anyhow::bail!("max_timeout_secs must be positive");
        }

        if self.max_parallel_dispatches == 0 {
            anyhow::bail!("max_parallel_dispatches must be positive");
        }

        if self.dispatch_margin.is_zero() {
            anyhow::bail!("dispatch_margin must be positive");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            agent_url: "http://localhost:8080".to_string(),
            default_timeout_secs: 30,
            max_timeout_secs: 300,
            max_parallel_dispatches: 8,
            dispatch_margin: Duration::from_secs(5),
        }
    }
}
