//! Pod readiness check
//!
//! Partitions the pods of a namespace into groups by name prefix and emits
//! a finding for every group that has no ready pod left. A prefix with no
//! matching pods at all is indistinguishable from one whose pods are all
//! unready; both count as zero ready pods.

use k8s_openapi::api::core::v1::Pod;
use serde::Deserialize;
use tracing::debug;

use crate::cluster::ClusterReader;
use crate::error::Result;
use crate::findings::{Finding, FindingSeverity, FindingSource};
use crate::sink::FindingSink;

/// Parameters for the pod readiness check
#[derive(Debug, Clone, Deserialize)]
pub struct PodReadyParams {
    /// Name prefixes that partition pods into groups
    pub prefixes: Vec<String>,
    /// Namespace the groups live in
    pub namespace: String,
}

/// Returns true if the pod carries a `Ready` condition with status `True`
pub fn is_ready(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|status| status.conditions.as_ref())
        .map(|conds| {
            conds
                .iter()
                .any(|c| c.type_ == "Ready" && c.status == "True")
        })
        .unwrap_or(false)
}

fn pod_name(pod: &Pod) -> &str {
    pod.metadata.name.as_deref().unwrap_or_default()
}

/// Count pods whose name starts with `prefix` and which are ready
pub fn ready_pods_with_prefix(pods: &[Pod], prefix: &str) -> usize {
    pods.iter()
        .filter(|p| pod_name(p).starts_with(prefix) && is_ready(p))
        .count()
}

/// Evaluate one prefix against a pod snapshot
pub fn evaluate_pod_ready(pods: &[Pod], prefix: &str, aggregation_key: &str) -> Option<Finding> {
    if ready_pods_with_prefix(pods, prefix) > 0 {
        return None;
    }

    let title = format!("No ready pods left with prefix {prefix}");
    Some(Finding::new(
        title.clone(),
        FindingSeverity::High,
        FindingSource::None,
        aggregation_key,
        title,
    ))
}

/// Batch mode: take one snapshot of the namespace and evaluate every
/// configured prefix against it
///
/// Returns the number of findings emitted. An API or sink error aborts the
/// pass; findings emitted before the error stay emitted.
pub async fn check_pod_ready(
    cluster: &dyn ClusterReader,
    sink: &dyn FindingSink,
    params: &PodReadyParams,
) -> Result<usize> {
    let pods = cluster.list_pods(&params.namespace).await?;
    let mut emitted = 0;

    for prefix in &params.prefixes {
        let matching = pods
            .iter()
            .filter(|p| pod_name(p).starts_with(prefix.as_str()))
            .count();
        debug!(
            prefix = %prefix,
            namespace = %params.namespace,
            matching_pods = matching,
            "Evaluating prefix"
        );

        let key = format!("Custom Event {prefix}");
        if let Some(finding) = evaluate_pod_ready(&pods, prefix, &key) {
            sink.emit(finding).await?;
            emitted += 1;
        }
    }

    Ok(emitted)
}

/// Event mode: a single pod lifecycle event names the group to re-evaluate
///
/// Only the first configured prefix the triggering pod matches is evaluated;
/// a pod that matches no prefix (or lives in another namespace) causes no
/// snapshot fetch and no finding. The aggregation key is derived from the
/// triggering pod's name.
pub async fn check_pod_ready_for_pod(
    cluster: &dyn ClusterReader,
    sink: &dyn FindingSink,
    params: &PodReadyParams,
    event_pod_name: &str,
    event_pod_namespace: &str,
) -> Result<usize> {
    for prefix in &params.prefixes {
        if event_pod_name.starts_with(prefix.as_str()) && event_pod_namespace == params.namespace {
            let pods = cluster.list_pods(&params.namespace).await?;

            let key = format!("Custom Event {event_pod_name}");
            if let Some(finding) = evaluate_pod_ready(&pods, prefix, &key) {
                sink.emit(finding).await?;
                return Ok(1);
            }
            return Ok(0);
        }
    }

    Ok(0)
}

#[cfg(test)]
mod evaluation_tests {
    use super::*;
    use crate::checks::tests::pod;

    #[test]
    fn test_ready_requires_ready_condition_true() {
        assert!(is_ready(&pod("web-1", true)));
        assert!(!is_ready(&pod("web-1", false)));
    }

    #[test]
    fn test_pod_without_status_is_unready() {
        let bare = Pod {
            metadata: kube::core::ObjectMeta {
                name: Some("web-1".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!is_ready(&bare));
    }

    #[test]
    fn test_ready_count_filters_by_prefix() {
        let pods = vec![pod("web-1", true), pod("web-2", false), pod("db-1", true)];
        assert_eq!(ready_pods_with_prefix(&pods, "web-"), 1);
        assert_eq!(ready_pods_with_prefix(&pods, "db-"), 1);
        assert_eq!(ready_pods_with_prefix(&pods, "cache-"), 0);
    }

    #[test]
    fn test_evaluate_emits_when_no_ready_pod() {
        let pods = vec![pod("web-1", false)];
        let finding = evaluate_pod_ready(&pods, "web-", "Custom Event web-").unwrap();

        assert_eq!(finding.title, "No ready pods left with prefix web-");
        assert_eq!(finding.severity, FindingSeverity::High);
        assert_eq!(finding.source, FindingSource::None);
        assert!(finding.aggregation_key.contains("web-"));
    }

    #[test]
    fn test_evaluate_silent_when_one_ready_pod() {
        let pods = vec![pod("web-1", true), pod("web-2", false)];
        assert!(evaluate_pod_ready(&pods, "web-", "Custom Event web-").is_none());
    }

    #[test]
    fn test_no_matching_pods_still_emits() {
        // "no pods exist" and "all matching pods unready" are conflated
        let pods = vec![pod("db-1", true)];
        assert!(evaluate_pod_ready(&pods, "web-", "Custom Event web-").is_some());
    }
}
