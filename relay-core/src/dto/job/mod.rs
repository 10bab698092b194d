//! Job DTOs for the coordinator API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::JobStatus;

/// Request to submit a new job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJobRequest {
    /// Shell command to execute
    pub command: String,
    /// Wall-clock budget in seconds; defaulted by the coordinator when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Response returned immediately on submission, before dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
