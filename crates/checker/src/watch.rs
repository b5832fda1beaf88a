//! Pod lifecycle event source
//!
//! Streams pod changes in the configured namespace and dispatches each one
//! as a `PodEvent` trigger. A failed pass degrades the checker component
//! while the stream keeps running; transient API errors are retried by the
//! watcher's backoff.

use std::sync::Arc;

use checker_lib::{
    health::{components, HealthRegistry},
    CheckMetrics, CheckRegistry, Trigger,
};
use futures::TryStreamExt;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::Api,
    runtime::{watcher, WatchStreamExt},
    Client, ResourceExt,
};
use tracing::{info, warn};

pub async fn watch_pods(
    client: Client,
    namespace: String,
    registry: Arc<CheckRegistry>,
    health: HealthRegistry,
    metrics: CheckMetrics,
) -> anyhow::Result<()> {
    let pods: Api<Pod> = Api::namespaced(client, &namespace);
    info!(namespace = %namespace, "Watching pod lifecycle events");
    health.set_healthy(components::POD_WATCHER).await;

    watcher(pods, watcher::Config::default())
        .default_backoff()
        .applied_objects()
        .try_for_each(|pod| {
            let registry = registry.clone();
            let health = health.clone();
            let metrics = metrics.clone();
            let namespace = namespace.clone();
            async move {
                let trigger = Trigger::PodEvent {
                    name: pod.name_any(),
                    namespace,
                };
                match registry.dispatch(&trigger).await {
                    Ok(emitted) => metrics.add_findings_emitted(emitted),
                    Err(err) => {
                        warn!(pod = %pod.name_any(), error = %err, "Pod-triggered pass failed");
                        metrics.inc_check_errors();
                        health
                            .set_degraded(components::CHECKER, err.to_string())
                            .await;
                    }
                }
                Ok(())
            }
        })
        .await?;

    health
        .set_unhealthy(components::POD_WATCHER, "watch stream ended")
        .await;
    Ok(())
}
