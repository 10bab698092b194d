//! In-memory job store and state machine
//!
//! The store exclusively owns every job record for the process lifetime.
//! All mutation goes through `mark_running` / `complete`, which validate the
//! transition and replace the record's fields in one critical section, so
//! concurrent readers never observe a half-written record. Records are never
//! removed.

use std::collections::HashMap;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use relay_core::domain::job::{FailureReason, Job, JobStatus};

/// Store error type
///
/// `IllegalTransition` signals a broken state-machine contract, a bug rather
/// than a user-facing condition; callers log it loudly and abort the unit of
/// work that attempted it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job {0} not found")]
    NotFound(Uuid),

    #[error("illegal transition for job {id}: {from} -> {to}")]
    IllegalTransition {
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    },
}

/// Everything a terminal transition writes, applied atomically
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// Must be `Completed` or `Failed`
    pub status: JobStatus,
    pub exit_code: Option<i32>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub runtime_ms: Option<u64>,
    pub error: Option<FailureReason>,
}

/// Snapshot of non-terminal record counts, for the gauges
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCounts {
    pub pending: u64,
    pub running: u64,
}

/// Concurrent-safe map of job records
///
/// An explicit component instance handed to the router and the dispatcher,
/// never an ambient global.
pub struct JobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a fresh `Pending` record and return a copy of it
    pub async fn create(&self, command: String, timeout_secs: u64) -> Job {
        let job = Job {
            id: Uuid::new_v4(),
            command,
            timeout_secs,
            status: JobStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            exit_code: None,
            stdout: None,
            stderr: None,
            runtime_ms: None,
            error: None,
        };

        self.jobs.write().await.insert(job.id, job.clone());
        debug!(job_id = %job.id, "job record created");
        job
    }

    /// Copy of the current record, if any
    pub async fn get(&self, id: Uuid) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// All records, oldest first
    pub async fn list(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by_key(|j| j.created_at);
        jobs
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// `Pending -> Running`, recording `started_at`
    pub async fn mark_running(&self, id: Uuid) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if !job.status.can_transition_to(JobStatus::Running) {
            return Err(StoreError::IllegalTransition {
                id,
                from: job.status,
                to: JobStatus::Running,
            });
        }

        job.status = JobStatus::Running;
        job.started_at = Some(Utc::now());
        Ok(job.clone())
    }

    /// `Running -> {Completed, Failed}`, applying the whole outcome at once
    pub async fn complete(&self, id: Uuid, outcome: JobOutcome) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if !outcome.status.is_terminal() || !job.status.can_transition_to(outcome.status) {
            return Err(StoreError::IllegalTransition {
                id,
                from: job.status,
                to: outcome.status,
            });
        }

        job.status = outcome.status;
        job.exit_code = outcome.exit_code;
        job.stdout = outcome.stdout;
        job.stderr = outcome.stderr;
        job.runtime_ms = outcome.runtime_ms;
        job.error = outcome.error;
        job.completed_at = Some(Utc::now());
        Ok(job.clone())
    }

    /// Count non-terminal records under one read lock
    pub async fn status_counts(&self) -> StatusCounts {
        let jobs = self.jobs.read().await;
        let mut counts = StatusCounts::default();
        for job in jobs.values() {
            match job.status {
                JobStatus::Pending => counts.pending += 1,
                JobStatus::Running => counts.running += 1,
                _ => {}
            }
        }
        counts
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}
