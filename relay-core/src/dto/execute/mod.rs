//! Execution DTOs for the agent API

use serde::{Deserialize, Serialize};

/// Request to execute one command under a deadline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// Shell command to execute
    pub command: String,
    /// Wall-clock budget in seconds; enforced by the agent's engine
    pub timeout_secs: u64,
}

/// Structured result of one execution attempt
///
/// Returned for every run that actually started, including non-zero exits
/// and deadline kills. Transient: the dispatcher folds it into the job
/// record and discards it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResponse {
    /// Process exit code, or the sentinel `-1` on timeout / death by signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Measured wall-clock duration of the attempt
    pub runtime_ms: u64,
    /// True when the deadline fired and the process was killed
    pub timed_out: bool,
}
