//! Autoscaler limit check
//!
//! Flags HorizontalPodAutoscalers that have scaled all the way to their
//! configured replica ceiling. The comparison is `>=` so a replica count
//! that somehow exceeded the configured maximum still raises a finding.

use k8s_openapi::api::autoscaling::v1::HorizontalPodAutoscaler;
use serde::Deserialize;

use crate::cluster::ClusterReader;
use crate::error::Result;
use crate::findings::{Finding, FindingSeverity, FindingSource};
use crate::sink::FindingSink;

/// Parameters for the autoscaler limit check
#[derive(Debug, Clone, Deserialize)]
pub struct HpaLimitParams {
    /// Names of the autoscalers to monitor
    pub hpa_names: Vec<String>,
    /// Namespace the autoscalers live in
    pub namespace: String,
}

/// Evaluate one autoscaler's status against its configured ceiling
///
/// An autoscaler that has not reported status yet counts as zero current
/// replicas and never reaches a valid ceiling (maxReplicas is at least 1).
/// An autoscaler without a spec is skipped.
pub fn evaluate_hpa_limit(hpa: &HorizontalPodAutoscaler) -> Option<Finding> {
    let name = hpa.metadata.name.as_deref().unwrap_or_default();
    let namespace = hpa.metadata.namespace.as_deref().unwrap_or_default();
    let spec = hpa.spec.as_ref()?;
    let current = hpa.status.as_ref().map(|s| s.current_replicas).unwrap_or(0);

    if current >= spec.max_replicas {
        Some(Finding::new(
            format!("HPA Limit Reached for {name}"),
            FindingSeverity::High,
            FindingSource::None,
            format!("Hpa limit reached {name}"),
            format!(
                "The HPA {name} in namespace {namespace} has reached its maximum limit of {} replicas.",
                spec.max_replicas
            ),
        ))
    } else {
        None
    }
}

/// Read each configured autoscaler and evaluate it
///
/// Every name triggers its own independent fetch; cross-entity snapshot
/// consistency is not guaranteed. A missing autoscaler or API error aborts
/// the whole pass, with findings emitted before the failure staying emitted.
pub async fn check_hpa_limits(
    cluster: &dyn ClusterReader,
    sink: &dyn FindingSink,
    params: &HpaLimitParams,
) -> Result<usize> {
    let mut emitted = 0;

    for name in &params.hpa_names {
        let hpa = cluster.read_autoscaler(name, &params.namespace).await?;
        if let Some(finding) = evaluate_hpa_limit(&hpa) {
            sink.emit(finding).await?;
            emitted += 1;
        }
    }

    Ok(emitted)
}
