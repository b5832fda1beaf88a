//! Cluster check agent library
//!
//! This crate provides the core functionality for:
//! - Declarative health checks over Kubernetes resources
//! - Finding construction and emission
//! - Explicit trigger-to-check registration
//! - Health checks and observability

pub mod checks;
pub mod cluster;
pub mod error;
pub mod findings;
pub mod health;
pub mod observability;
pub mod sink;
pub mod triggers;

pub use checks::{
    check_hpa_limits, check_pod_ready, check_pod_ready_for_pod, evaluate_hpa_limit,
    evaluate_pod_ready, HpaLimitParams, PodReadyParams,
};
pub use cluster::{ClusterReader, KubeClusterReader};
pub use error::{CheckError, Result};
pub use findings::{Finding, FindingSeverity, FindingSource};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use observability::{CheckLogger, CheckMetrics};
pub use sink::{FindingSink, LogSink, MemorySink, WebhookSink};
pub use triggers::{CheckHandler, CheckRegistry, Trigger, TriggerKind};
