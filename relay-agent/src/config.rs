//! Agent configuration
//!
//! Defines all configurable parameters for the agent: bind address, output
//! capture cap, and the accepted timeout range.

/// Agent configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Per-stream byte cap on captured stdout/stderr
    pub max_output_bytes: usize,

    /// Upper bound on the per-job timeout a request may ask for
    pub max_timeout_secs: u64,
}

impl Config {
    /// Creates configuration from environment variables with fallback to defaults
    ///
    /// Recognized environment variables:
    /// - AGENT_BIND_ADDR (default: 0.0.0.0:8080)
    /// - MAX_OUTPUT_BYTES (default: 65536)
    /// - MAX_TIMEOUT_SECS (default: 300)
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("AGENT_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let max_output_bytes = std::env::var("MAX_OUTPUT_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(65536);

        let max_timeout_secs = std::env::var("MAX_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(300);

        Self {
            bind_addr,
            max_output_bytes,
            max_timeout_secs,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.max_output_bytes == 0 {
            anyhow::bail!("max_output_bytes must be positive");
        }

        if self.max_timeout_secs == 0 {
            anyhow::bail!("max_timeout_secs must be positive");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            max_output_bytes: 65536,
            max_timeout_secs: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_output_bytes, 65536);
        assert_eq!(config.max_timeout_secs, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.max_output_bytes = 0;
        assert!(config.validate().is_err());

        config.max_output_bytes = 1024;
        config.max_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
