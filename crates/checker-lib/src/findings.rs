//! Finding model shared by all checks
//!
//! A finding is the immutable output record of a violated check condition.
//! The downstream alerting pipeline groups repeated findings by their
//! aggregation key; this crate never deduplicates across passes.

use serde::{Deserialize, Serialize};

/// Severity attached to an emitted finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSeverity {
    Info,
    Low,
    Medium,
    High,
}

impl std::fmt::Display for FindingSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FindingSeverity::Info => write!(f, "info"),
            FindingSeverity::Low => write!(f, "low"),
            FindingSeverity::Medium => write!(f, "medium"),
            FindingSeverity::High => write!(f, "high"),
        }
    }
}

/// Origin classification of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSource {
    None,
    KubernetesApiServer,
    Scheduler,
}

impl std::fmt::Display for FindingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FindingSource::None => write!(f, "none"),
            FindingSource::KubernetesApiServer => write!(f, "kubernetes_api_server"),
            FindingSource::Scheduler => write!(f, "scheduler"),
        }
    }
}

/// Structured alert record describing a detected condition
///
/// Constructed once by a check and handed to the sink; never mutated after
/// emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub title: String,
    pub severity: FindingSeverity,
    pub source: FindingSource,
    /// Deduplication identifier for the downstream alerting pipeline
    pub aggregation_key: String,
    pub description: String,
}

impl Finding {
    pub fn new(
        title: impl Into<String>,
        severity: FindingSeverity,
        source: FindingSource,
        aggregation_key: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            severity,
            source,
            aggregation_key: aggregation_key.into(),
            description: description.into(),
        }
    }
}
