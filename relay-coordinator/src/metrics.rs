//! Prometheus metrics for the coordinator
//!
//! Job counters, queue-depth gauges, and a runtime histogram, exported in the
//! text exposition format at `GET /metrics`. The dispatcher records exactly
//! one outcome per job; the gauges are refreshed from a store snapshot when
//! metrics are scraped.

use prometheus::{Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

use crate::store::StatusCounts;

#[derive(Clone)]
pub struct CoordinatorMetrics {
    registry: Registry,
    jobs_total: IntCounter,
    jobs_completed_total: IntCounter,
    jobs_failed_total: IntCounter,
    jobs_pending: IntGauge,
    jobs_running: IntGauge,
    job_runtime_seconds: Histogram,
}

impl CoordinatorMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let jobs_total = IntCounter::new("relay_jobs_total", "Total number of jobs submitted")?;
        let jobs_completed_total = IntCounter::new(
            "relay_jobs_completed_total",
            "Total number of jobs that completed with exit code zero",
        )?;
        let jobs_failed_total = IntCounter::new(
            "relay_jobs_failed_total",
            "Total number of jobs that failed (non-zero exit, timeout, or transport failure)",
        )?;
        let jobs_pending = IntGauge::new("relay_jobs_pending", "Current number of pending jobs")?;
        let jobs_running = IntGauge::new("relay_jobs_running", "Current number of running jobs")?;
        let job_runtime_seconds = Histogram::with_opts(
            HistogramOpts::new("relay_job_runtime_seconds", "Wall-clock job runtime")
                .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0]),
        )?;

        registry.register(Box::new(jobs_total.clone()))?;
        registry.register(Box::new(jobs_completed_total.clone()))?;
        registry.register(Box::new(jobs_failed_total.clone()))?;
        registry.register(Box::new(jobs_pending.clone()))?;
        registry.register(Box::new(jobs_running.clone()))?;
        registry.register(Box::new(job_runtime_seconds.clone()))?;

        Ok(Self {
            registry,
            jobs_total,
            jobs_completed_total,
            jobs_failed_total,
            jobs_pending,
            jobs_running,
            job_runtime_seconds,
        })
    }

    /// Count one accepted submission
    pub fn record_submitted(&self) {
        self.jobs_total.inc();
    }

    /// Count one terminal outcome, exactly once per job on every branch
    pub fn record_outcome(&self, completed: bool, runtime_ms: u64) {
        if completed {
            self.jobs_completed_total.inc();
        } else {
            self.jobs_failed_total.inc();
        }
        self.job_runtime_seconds.observe(runtime_ms as f64 / 1000.0);
    }

    /// Refresh the queue-depth gauges from a store snapshot
    pub fn set_queue_depths(&self, counts: StatusCounts) {
        self.jobs_pending.set(counts.pending as i64);
        self.jobs_running.set(counts.running as i64);
    }

    /// Encode all registered metrics in the text exposition format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        encoder.encode_to_string(&metric_families)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_counters_add_up() {
        let metrics = CoordinatorMetrics::new().unwrap();

        for _ in 0..5 {
            metrics.record_submitted();
        }
        metrics.record_outcome(true, 10);
        metrics.record_outcome(true, 20);
        metrics.record_outcome(false, 30);

        assert_eq!(metrics.jobs_total.get(), 5);
        assert_eq!(metrics.jobs_completed_total.get(), 2);
        assert_eq!(metrics.jobs_failed_total.get(), 1);
    }

    #[test]
    fn test_gather_includes_gauges_and_histogram() {
        let metrics = CoordinatorMetrics::new().unwrap();
        metrics.record_submitted();
        metrics.record_outcome(true, 250);
        metrics.set_queue_depths(StatusCounts {
            pending: 3,
            running: 1,
        });

        let text = metrics.gather().unwrap();
        assert!(text.contains("relay_jobs_total 1"));
        assert!(text.contains("relay_jobs_pending 3"));
        assert!(text.contains("relay_jobs_running 1"));
        assert!(text.contains("relay_job_runtime_seconds_count 1"));
    }
}
