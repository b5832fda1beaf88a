//! Check registration
//!
//! Builds the trigger-to-handler map at process start. Checks with no
//! configured targets are not registered at all.

use std::sync::Arc;

use checker_lib::{
    check_hpa_limits, check_pod_ready, check_pod_ready_for_pod, CheckRegistry, ClusterReader,
    FindingSink, HpaLimitParams, PodReadyParams, Trigger, TriggerKind,
};

use crate::config::CheckerConfig;

/// Wire every configured check to the triggers that invoke it
pub fn build_registry(
    cluster: Arc<dyn ClusterReader>,
    sink: Arc<dyn FindingSink>,
    config: &CheckerConfig,
) -> CheckRegistry {
    let mut registry = CheckRegistry::new();

    if !config.pod_prefixes.is_empty() {
        let params = PodReadyParams {
            prefixes: config.pod_prefixes.clone(),
            namespace: config.namespace.clone(),
        };
        register_pod_checks(&mut registry, cluster.clone(), sink.clone(), params);
    }

    if !config.hpa_names.is_empty() {
        let params = HpaLimitParams {
            hpa_names: config.hpa_names.clone(),
            namespace: config.namespace.clone(),
        };
        register_hpa_check(&mut registry, cluster, sink, params);
    }

    registry
}

fn register_pod_checks(
    registry: &mut CheckRegistry,
    cluster: Arc<dyn ClusterReader>,
    sink: Arc<dyn FindingSink>,
    params: PodReadyParams,
) {
    // Batch pass on the timer
    {
        let cluster = cluster.clone();
        let sink = sink.clone();
        let params = params.clone();
        registry.register(
            TriggerKind::Scheduled,
            "pod_ready",
            Arc::new(move |_trigger| {
                let cluster = cluster.clone();
                let sink = sink.clone();
                let params = params.clone();
                Box::pin(async move {
                    check_pod_ready(cluster.as_ref(), sink.as_ref(), &params).await
                })
            }),
        );
    }

    // Change events re-run the batch pass; the payload is only a signal
    {
        let cluster = cluster.clone();
        let sink = sink.clone();
        let params = params.clone();
        registry.register(
            TriggerKind::KubeChange,
            "pod_ready_on_change",
            Arc::new(move |_trigger| {
                let cluster = cluster.clone();
                let sink = sink.clone();
                let params = params.clone();
                Box::pin(async move {
                    check_pod_ready(cluster.as_ref(), sink.as_ref(), &params).await
                })
            }),
        );
    }

    // Pod lifecycle events evaluate only the group the pod belongs to
    registry.register(
        TriggerKind::PodEvent,
        "pod_ready_on_pod_event",
        Arc::new(move |trigger| {
            let cluster = cluster.clone();
            let sink = sink.clone();
            let params = params.clone();
            Box::pin(async move {
                match trigger {
                    Trigger::PodEvent { name, namespace } => {
                        check_pod_ready_for_pod(
                            cluster.as_ref(),
                            sink.as_ref(),
                            &params,
                            &name,
                            &namespace,
                        )
                        .await
                    }
                    _ => Ok(0),
                }
            })
        }),
    );
}

fn register_hpa_check(
    registry: &mut CheckRegistry,
    cluster: Arc<dyn ClusterReader>,
    sink: Arc<dyn FindingSink>,
    params: HpaLimitParams,
) {
    registry.register(
        TriggerKind::Scheduled,
        "hpa_limits",
        Arc::new(move |_trigger| {
            let cluster = cluster.clone();
            let sink = sink.clone();
            let params = params.clone();
            Box::pin(async move {
                check_hpa_limits(cluster.as_ref(), sink.as_ref(), &params).await
            })
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use checker_lib::{CheckError, MemorySink, Result};
    use k8s_openapi::api::autoscaling::v1::HorizontalPodAutoscaler;
    use k8s_openapi::api::core::v1::{Pod, PodCondition, PodStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    struct FakeCluster {
        pods: Vec<Pod>,
    }

    #[async_trait]
    impl ClusterReader for FakeCluster {
        async fn list_pods(&self, _namespace: &str) -> Result<Vec<Pod>> {
            Ok(self.pods.clone())
        }

        async fn read_autoscaler(
            &self,
            name: &str,
            _namespace: &str,
        ) -> Result<HorizontalPodAutoscaler> {
            Err(CheckError::Config(format!("no autoscaler {name} in fake")))
        }
    }

    fn unready_pod(name: &str) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            status: Some(PodStatus {
                conditions: Some(vec![PodCondition {
                    type_: "Ready".to_string(),
                    status: "False".to_string(),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn test_config(prefixes: &[&str], hpa_names: &[&str]) -> CheckerConfig {
        CheckerConfig {
            namespace: "default".to_string(),
            pod_prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            hpa_names: hpa_names.iter().map(|n| n.to_string()).collect(),
            check_interval_secs: 60,
            api_port: 8080,
            webhook_url: None,
            watch_pods: true,
        }
    }

    #[test]
    fn test_registry_wires_all_trigger_kinds() {
        let cluster = Arc::new(FakeCluster { pods: Vec::new() });
        let sink = Arc::new(MemorySink::new());
        let registry = build_registry(cluster, sink, &test_config(&["web-"], &["api-hpa"]));

        // Scheduled runs the batch pod check and the HPA check
        assert_eq!(registry.handler_count(TriggerKind::Scheduled), 2);
        assert_eq!(registry.handler_count(TriggerKind::PodEvent), 1);
        assert_eq!(registry.handler_count(TriggerKind::KubeChange), 1);
    }

    #[test]
    fn test_empty_config_registers_nothing() {
        let cluster = Arc::new(FakeCluster { pods: Vec::new() });
        let sink = Arc::new(MemorySink::new());
        let registry = build_registry(cluster, sink, &test_config(&[], &[]));

        assert_eq!(registry.handler_count(TriggerKind::Scheduled), 0);
        assert_eq!(registry.handler_count(TriggerKind::PodEvent), 0);
        assert_eq!(registry.handler_count(TriggerKind::KubeChange), 0);
    }

    #[tokio::test]
    async fn test_scheduled_dispatch_emits_pod_finding() {
        let cluster = Arc::new(FakeCluster {
            pods: vec![unready_pod("web-1")],
        });
        let sink = Arc::new(MemorySink::new());
        let registry = build_registry(cluster, sink.clone(), &test_config(&["web-"], &[]));

        let emitted = registry.dispatch(&Trigger::Scheduled).await.unwrap();

        assert_eq!(emitted, 1);
        assert_eq!(sink.take()[0].aggregation_key, "Custom Event web-");
    }

    #[tokio::test]
    async fn test_change_event_dispatch_behaves_like_batch() {
        let cluster = Arc::new(FakeCluster {
            pods: vec![unready_pod("web-1")],
        });
        let sink = Arc::new(MemorySink::new());
        let registry = build_registry(cluster, sink.clone(), &test_config(&["web-"], &[]));

        let trigger = Trigger::KubeChange {
            namespace: "default".to_string(),
        };
        let emitted = registry.dispatch(&trigger).await.unwrap();

        assert_eq!(emitted, 1);
        // Keyed by prefix, exactly as the batch pass
        assert_eq!(sink.take()[0].aggregation_key, "Custom Event web-");
    }

    #[tokio::test]
    async fn test_pod_event_dispatch_keys_by_pod_name() {
        let cluster = Arc::new(FakeCluster {
            pods: vec![unready_pod("web-1")],
        });
        let sink = Arc::new(MemorySink::new());
        let registry = build_registry(cluster, sink.clone(), &test_config(&["web-"], &[]));

        let trigger = Trigger::PodEvent {
            name: "web-1".to_string(),
            namespace: "default".to_string(),
        };
        let emitted = registry.dispatch(&trigger).await.unwrap();

        assert_eq!(emitted, 1);
        assert_eq!(sink.take()[0].aggregation_key, "Custom Event web-1");
    }
}
