//! Dispatcher
//!
//! Bridges job creation to agent execution without blocking the submission
//! path. Each created job gets exactly one dispatch unit, which marks the
//! job running, calls the agent, and folds the structured result or the
//! call's failure into a single terminal store update. Concurrency across
//! units is capped by a semaphore; jobs waiting on a permit stay `Pending`.
//!
//! No retries: a job is dispatched at most once.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{error, info};
use uuid::Uuid;

use relay_client::{AgentClient, ClientError};
use relay_core::domain::job::{FailureKind, FailureReason, JobStatus};
use relay_core::dto::execute::{ExecuteRequest, ExecuteResponse};

use crate::config::Config;
use crate::metrics::CoordinatorMetrics;
use crate::store::{JobOutcome, JobStore, StoreError};

#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<JobStore>,
    client: Arc<AgentClient>,
    metrics: CoordinatorMetrics,
    semaphore: Arc<Semaphore>,
    dispatch_margin: Duration,
}

impl Dispatcher {
    pub fn new(
        store: Arc<JobStore>,
        client: Arc<AgentClient>,
        metrics: CoordinatorMetrics,
        config: &Config,
    ) -> Self {
        Self {
            store,
            client,
            metrics,
            semaphore: Arc::new(Semaphore::new(config.max_parallel_dispatches)),
            dispatch_margin: config.dispatch_margin,
        }
    }

    /// Schedule the dispatch unit for a newly created job
    ///
    /// Returns immediately; admission happens inside the spawned task so the
    /// submission path never waits on a permit.
    pub fn spawn(&self, job_id: Uuid) {
        let dispatcher = self.clone();

        tokio::spawn(async move {
            // Held for the whole execution; released on every exit path.
            let _permit = match dispatcher.semaphore.acquire().await {
                Ok(permit) => permit,
                Err(_) => {
                    error!(job_id = %job_id, "dispatch semaphore closed");
                    return;
                }
            };

            if let Err(e) = dispatcher.dispatch(job_id).await {
                // A store refusal here means the state-machine contract
                // broke; surface it loudly and abort this unit.
                error!(job_id = %job_id, error = %e, "invariant violation in dispatch unit");
                debug_assert!(false, "invariant violation: {}", e);
            }
        });
    }

    async fn dispatch(&self, job_id: Uuid) -> Result<(), StoreError> {
        let job = self.store.mark_running(job_id).await?;

        info!(job_id = %job_id, command = %job.command, timeout_secs = job.timeout_secs, "dispatching job");

        // The agent enforces the job timeout itself; the call-level deadline
        // only has to catch transport stalls, so it gets a fixed margin on top.
        let deadline = Duration::from_secs(job.timeout_secs) + self.dispatch_margin;
        let started = Instant::now();

        let result = self
            .client
            .execute(
                &ExecuteRequest {
                    command: job.command.clone(),
                    timeout_secs: job.timeout_secs,
                },
                deadline,
            )
            .await;

        let outcome = match result {
            Ok(response) => outcome_from_response(response, job.timeout_secs),
            Err(e) => outcome_from_error(e, started.elapsed()),
        };

        let completed = outcome.status == JobStatus::Completed;
        let runtime_ms = outcome.runtime_ms.unwrap_or(0);

        let job = self.store.complete(job_id, outcome).await?;

        // Exactly one outcome observation per job, after the terminal write.
        self.metrics.record_outcome(completed, runtime_ms);

        info!(
            job_id = %job_id,
            status = %job.status,
            exit_code = job.exit_code,
            runtime_ms,
            "job reached terminal state"
        );

        Ok(())
    }
}

/// Fold a structured agent response into a terminal outcome
///
/// A non-zero exit is a normal failure with no `FailureReason`; only the
/// deadline kill gets one. Output and exit code are recorded either way.
fn outcome_from_response(response: ExecuteResponse, timeout_secs: u64) -> JobOutcome {
    let (status, error) = if response.timed_out {
        (
            JobStatus::Failed,
            Some(FailureReason::new(
                FailureKind::Timeout,
                format!("execution exceeded its {}s timeout", timeout_secs),
            )),
        )
    } else if response.exit_code == 0 {
        (JobStatus::Completed, None)
    } else {
        (JobStatus::Failed, None)
    };

    JobOutcome {
        status,
        exit_code: Some(response.exit_code),
        stdout: Some(response.stdout),
        stderr: Some(response.stderr),
        runtime_ms: Some(response.runtime_ms),
        error,
    }
}

/// Fold a failed agent call into a terminal outcome
///
/// No structured result means no exit code; the runtime is measured locally.
fn outcome_from_error(err: ClientError, elapsed: Duration) -> JobOutcome {
    let kind = if err.is_spawn_error() {
        FailureKind::Spawn
    } else if err.is_invalid_request() {
        // The coordinator validated this job at admission; an agent-side
        // rejection on dispatch is a bug, not an operational failure.
        FailureKind::Internal
    } else {
        FailureKind::Transport
    };

    JobOutcome {
        status: JobStatus::Failed,
        exit_code: None,
        stdout: None,
        stderr: None,
        runtime_ms: Some(elapsed.as_millis() as u64),
        error: Some(FailureReason::new(kind, err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::domain::job::SENTINEL_EXIT_CODE;

    fn response(exit_code: i32, timed_out: bool) -> ExecuteResponse {
        ExecuteResponse {
            exit_code,
            stdout: "out".to_string(),
            stderr: "err".to_string(),
            runtime_ms: 100,
            timed_out,
        }
    }

    #[test]
    fn test_zero_exit_completes() {
        let outcome = outcome_from_response(response(0, false), 30);
        assert_eq!(outcome.status, JobStatus::Completed);
        assert_eq!(outcome.exit_code, Some(0));
        assert!(outcome.error.is_none());
        assert_eq!(outcome.stdout.as_deref(), Some("out"));
    }

    #[test]
    fn test_nonzero_exit_fails_without_a_reason() {
        let outcome = outcome_from_response(response(2, false), 30);
        assert_eq!(outcome.status, JobStatus::Failed);
        assert_eq!(outcome.exit_code, Some(2));
        assert!(outcome.error.is_none());
        assert_eq!(outcome.stderr.as_deref(), Some("err"));
    }

    #[test]
    fn test_engine_timeout_fails_with_timeout_reason() {
        let outcome = outcome_from_response(response(SENTINEL_EXIT_CODE, true), 30);
        assert_eq!(outcome.status, JobStatus::Failed);
        assert_eq!(outcome.exit_code, Some(SENTINEL_EXIT_CODE));
        let reason = outcome.error.unwrap();
        assert_eq!(reason.kind, FailureKind::Timeout);
        assert!(reason.message.contains("30s"));
    }

    #[test]
    fn test_spawn_error_maps_to_spawn_kind() {
        let err = ClientError::api_error(422, Some("spawn_error".to_string()), "no such shell");
        let outcome = outcome_from_error(err, Duration::from_millis(40));
        assert_eq!(outcome.status, JobStatus::Failed);
        assert!(outcome.exit_code.is_none());
        assert_eq!(outcome.error.unwrap().kind, FailureKind::Spawn);
    }

    #[test]
    fn test_agent_rejection_maps_to_internal_kind() {
        let err = ClientError::api_error(400, Some("invalid_request".to_string()), "bad timeout");
        let outcome = outcome_from_error(err, Duration::from_millis(5));
        assert_eq!(outcome.error.unwrap().kind, FailureKind::Internal);
    }

    #[test]
    fn test_other_failures_map_to_transport_kind() {
        let err = ClientError::ParseError("garbled body".to_string());
        let outcome = outcome_from_error(err, Duration::from_millis(5000));
        let reason = outcome.error.unwrap();
        assert_eq!(reason.kind, FailureKind::Transport);
        assert_eq!(outcome.runtime_ms, Some(5000));
        assert!(outcome.exit_code.is_none());
    }
}
