//! Prometheus metrics for the agent
//!
//! Counters and a runtime histogram for command executions, exported in the
//! text exposition format at `GET /metrics`.

use prometheus::{Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

use crate::engine::ExecutionResult;

/// Per-process execution metrics, backed by a private registry
#[derive(Clone)]
pub struct AgentMetrics {
    registry: Registry,
    executions_total: IntCounter,
    executions_success_total: IntCounter,
    executions_failed_total: IntCounter,
    execution_runtime_seconds: Histogram,
}

impl AgentMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let executions_total = IntCounter::new(
            "relay_executions_total",
            "Total number of command executions",
        )?;
        let executions_success_total = IntCounter::new(
            "relay_executions_success_total",
            "Total number of executions that exited zero within their deadline",
        )?;
        let executions_failed_total = IntCounter::new(
            "relay_executions_failed_total",
            "Total number of executions that exited non-zero, timed out, or failed to spawn",
        )?;
        let execution_runtime_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "relay_execution_runtime_seconds",
                "Wall-clock duration of execution attempts",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0]),
        )?;

        registry.register(Box::new(executions_total.clone()))?;
        registry.register(Box::new(executions_success_total.clone()))?;
        registry.register(Box::new(executions_failed_total.clone()))?;
        registry.register(Box::new(execution_runtime_seconds.clone()))?;

        Ok(Self {
            registry,
            executions_total,
            executions_success_total,
            executions_failed_total,
            execution_runtime_seconds,
        })
    }

    /// Record one completed execution attempt, exactly once per call
    pub fn record(&self, result: &ExecutionResult) {
        self.executions_total.inc();
        if result.success() {
            self.executions_success_total.inc();
        } else {
            self.executions_failed_total.inc();
        }
        self.execution_runtime_seconds
            .observe(result.runtime_ms as f64 / 1000.0);
    }

    /// Record an attempt that never produced a process
    pub fn record_spawn_failure(&self) {
        self.executions_total.inc();
        self.executions_failed_total.inc();
    }

    /// Encode all registered metrics in the text exposition format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        encoder.encode_to_string(&metric_families)
    }
}
