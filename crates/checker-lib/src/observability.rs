//! Observability infrastructure for the check agent
//!
//! Provides:
//! - Prometheus metrics (pass latency, pass/finding/error totals)
//! - Structured logging helpers for lifecycle and finding events

use prometheus::{register_histogram, register_int_gauge, Histogram, IntGauge};
use std::sync::OnceLock;
use tracing::{error, info, warn};

use crate::findings::Finding;

/// Histogram buckets for pass latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<CheckMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct CheckMetricsInner {
    pass_latency_seconds: Histogram,
    passes_total: IntGauge,
    findings_emitted_total: IntGauge,
    check_errors_total: IntGauge,
}

impl CheckMetricsInner {
    fn new() -> Self {
        Self {
            pass_latency_seconds: register_histogram!(
                "check_agent_pass_latency_seconds",
                "Time spent running one evaluation pass",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register pass_latency_seconds"),

            passes_total: register_int_gauge!(
                "check_agent_passes_total",
                "Total number of evaluation passes completed"
            )
            .expect("Failed to register passes_total"),

            findings_emitted_total: register_int_gauge!(
                "check_agent_findings_emitted_total",
                "Total number of findings emitted to the sink"
            )
            .expect("Failed to register findings_emitted_total"),

            check_errors_total: register_int_gauge!(
                "check_agent_check_errors_total",
                "Total number of evaluation passes aborted by an error"
            )
            .expect("Failed to register check_errors_total"),
        }
    }
}

/// Metrics handle for the check agent
///
/// A lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct CheckMetrics {
    _private: (),
}

impl Default for CheckMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(CheckMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &CheckMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record the latency of a completed pass
    pub fn observe_pass_latency(&self, duration_secs: f64) {
        self.inner().pass_latency_seconds.observe(duration_secs);
    }

    pub fn inc_passes(&self) {
        self.inner().passes_total.inc();
    }

    pub fn add_findings_emitted(&self, count: usize) {
        self.inner().findings_emitted_total.add(count as i64);
    }

    pub fn inc_check_errors(&self) {
        self.inner().check_errors_total.inc();
    }
}

/// Structured logger for check agent lifecycle and finding events
#[derive(Clone)]
pub struct CheckLogger {
    namespace: String,
}

impl CheckLogger {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn log_startup(&self, version: &str) {
        info!(
            event = "agent_started",
            namespace = %self.namespace,
            agent_version = %version,
            "Check agent started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "agent_shutdown",
            namespace = %self.namespace,
            reason = %reason,
            "Check agent shutting down"
        );
    }

    /// Log a finding at the moment it is emitted
    pub fn log_finding(&self, finding: &Finding) {
        warn!(
            event = "finding",
            namespace = %self.namespace,
            title = %finding.title,
            severity = %finding.severity,
            aggregation_key = %finding.aggregation_key,
            "Check condition violated"
        );
    }

    /// Log the outcome of a completed pass
    pub fn log_pass(&self, trigger: &str, emitted: usize, duration_secs: f64) {
        info!(
            event = "pass_completed",
            namespace = %self.namespace,
            trigger = %trigger,
            findings_emitted = emitted,
            duration_secs = duration_secs,
            "Evaluation pass completed"
        );
    }

    /// Log an aborted pass
    pub fn log_pass_error(&self, trigger: &str, error: &str) {
        error!(
            event = "pass_failed",
            namespace = %self.namespace,
            trigger = %trigger,
            error = %error,
            "Evaluation pass aborted"
        );
    }
}
