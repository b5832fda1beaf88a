//! Threshold checks over cluster snapshots
//!
//! Each check is a stateless pass: fetch a snapshot through the cluster
//! reader, evaluate a declarative condition, and emit at most one finding
//! per monitored entity. A pass holds no memory of prior evaluations.

mod hpa_limit;
mod pod_ready;


pub use hpa_limit::{check_hpa_limits, evaluate_hpa_limit, HpaLimitParams};
pub use pod_ready::{
    check_pod_ready, check_pod_ready_for_pod, evaluate_pod_ready, is_ready,
    ready_pods_with_prefix, PodReadyParams,
};
