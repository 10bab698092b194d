//! Execution engine
//!
//! Runs one shell command to completion or forced termination under a
//! wall-clock deadline. This is the only module that touches OS process
//! primitives; no child process may outlive a call on any path.

use std::process::Stdio;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use relay_core::domain::job::SENTINEL_EXIT_CODE;
use relay_core::dto::execute::ExecuteResponse;

/// Marker appended to a captured stream that hit its byte cap
pub const TRUNCATION_MARKER: &str = "\n[output truncated]";

/// Outcome of one execution attempt that actually started
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Process exit code, or `SENTINEL_EXIT_CODE` on timeout / death by signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub runtime_ms: u64,
    pub timed_out: bool,
}

impl ExecutionResult {
    /// Success means the process exited zero within its deadline
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == 0
    }
}

impl From<ExecutionResult> for ExecuteResponse {
    fn from(result: ExecutionResult) -> Self {
        ExecuteResponse {
            exit_code: result.exit_code,
            stdout: result.stdout,
            stderr: result.stderr,
            runtime_ms: result.runtime_ms,
            timed_out: result.timed_out,
        }
    }
}

/// Engine-level failures, distinct from any process exit code
#[derive(Debug, Error)]
pub enum EngineError {
    /// The process could not be started at all
    #[error("failed to spawn process: {0}")]
    Spawn(#[source] std::io::Error),

    /// Waiting on a started process failed
    #[error("failed waiting for process: {0}")]
    Wait(#[source] std::io::Error),
}

/// Runs commands through the shell with bounded output capture
pub struct ExecutionEngine {
    shell: String,
    max_output_bytes: usize,
}

impl ExecutionEngine {
    /// Creates an engine capturing at most `max_output_bytes` per stream
    pub fn new(max_output_bytes: usize) -> Self {
        Self {
            shell: "sh".to_string(),
            max_output_bytes,
        }
    }

    #[cfg(test)]
    fn with_shell(shell: &str, max_output_bytes: usize) -> Self {
        Self {
            shell: shell.to_string(),
            max_output_bytes,
        }
    }

    /// Run `command` under `timeout`
    ///
    /// Returns a structured result for every run that started, including
    /// non-zero exits and deadline kills. The deadline path SIGKILLs the
    /// whole process group (the child is its own group leader), so
    /// descendants the command spawned die with it.
    pub async fn run(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<ExecutionResult, EngineError> {
        let started = Instant::now();

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(EngineError::Spawn)?;
        let pid = child.id();

        debug!(pid, command, "process spawned");

        // Capture both streams concurrently so the child never blocks on a
        // full pipe, even past the byte cap.
        let stdout_task = spawn_capture(child.stdout.take(), self.max_output_bytes);
        let stderr_task = spawn_capture(child.stderr.take(), self.max_output_bytes);

        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(status) => {
                let status = status.map_err(EngineError::Wait)?;
                let exit_code = status.code().unwrap_or(SENTINEL_EXIT_CODE);

                debug!(pid, exit_code, "process exited within deadline");

                Ok(ExecutionResult {
                    exit_code,
                    stdout: finish_capture(stdout_task).await,
                    stderr: finish_capture(stderr_task).await,
                    runtime_ms: started.elapsed().as_millis() as u64,
                    timed_out: false,
                })
            }
            Err(_) => {
                warn!(pid, ?timeout, "deadline elapsed, killing process group");
                kill_process_group(&mut child, pid).await;

                Ok(ExecutionResult {
                    exit_code: SENTINEL_EXIT_CODE,
                    stdout: finish_capture(stdout_task).await,
                    stderr: finish_capture(stderr_task).await,
                    runtime_ms: timeout.as_millis() as u64,
                    timed_out: true,
                })
            }
        }
    }
}

/// SIGKILL the child's whole process group, then reap the child
///
/// The group signal is best-effort (descendants may already be gone);
/// `Child::kill` both signals and awaits the direct child, so no zombie
/// is left behind.
async fn kill_process_group(child: &mut Child, pid: Option<u32>) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        // Negative pid addresses the whole group (process_group(0) above
        // made the child its own group leader).
        unsafe {
            libc::kill(-(pid as libc::pid_t), libc::SIGKILL);
        }
    }

    if let Err(e) = child.kill().await {
        warn!(pid, error = %e, "failed to kill timed-out process");
    }
}

/// Read a stream into a bounded buffer on its own task
///
/// Captures up to `cap` bytes, keeps draining (and discarding) afterwards,
/// and appends the truncation marker when the cap was hit.
fn spawn_capture<R>(reader: Option<R>, cap: usize) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut reader) = reader else {
            return String::new();
        };

        let mut captured: Vec<u8> = Vec::new();
        let mut truncated = false;
        let mut chunk = [0u8; 8192];

        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    let room = cap.saturating_sub(captured.len());
                    let take = n.min(room);
                    captured.extend_from_slice(&chunk[..take]);
                    if take < n {
                        truncated = true;
                    }
                }
                Err(_) => break,
            }
        }

        let mut out = String::from_utf8_lossy(&captured).into_owned();
        if truncated {
            out.push_str(TRUNCATION_MARKER);
        }
        out
    })
}

async fn finish_capture(task: JoinHandle<String>) -> String {
    task.await.unwrap_or_default()
}
