//! Check Agent - event and timer driven Kubernetes health checks
//!
//! Evaluates configured pod readiness and autoscaler limit checks against
//! live cluster state and emits findings to the configured sink.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use checker_lib::{
    health::{components, HealthRegistry},
    CheckLogger, CheckMetrics, CheckRegistry, ClusterReader, FindingSink, KubeClusterReader,
    LogSink, Trigger, WebhookSink,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod actions;
mod api;
mod config;
mod watch;

const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting check-agent");

    let config = config::CheckerConfig::load()?;
    info!(
        namespace = %config.namespace,
        pod_prefixes = ?config.pod_prefixes,
        hpa_names = ?config.hpa_names,
        "Agent configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::CHECKER).await;
    health_registry.register(components::API).await;
    if config.watch_pods {
        health_registry.register(components::POD_WATCHER).await;
    }

    let metrics = CheckMetrics::new();
    let logger = CheckLogger::new(&config.namespace);
    logger.log_startup(AGENT_VERSION);

    let kube_client = kube::Client::try_default().await?;
    let cluster: Arc<dyn ClusterReader> = Arc::new(KubeClusterReader::new(kube_client.clone()));
    let sink: Arc<dyn FindingSink> = match &config.webhook_url {
        Some(url) => Arc::new(WebhookSink::new(url.clone())),
        None => Arc::new(LogSink),
    };

    let registry = Arc::new(actions::build_registry(cluster, sink, &config));

    // Start health and metrics server
    let app_state = Arc::new(api::AppState::new(health_registry.clone(), metrics.clone()));
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    if config.watch_pods {
        tokio::spawn(watch::watch_pods(
            kube_client,
            config.namespace.clone(),
            registry.clone(),
            health_registry.clone(),
            metrics.clone(),
        ));
    }

    // Mark agent as ready after initialization
    health_registry.set_ready(true).await;

    let scheduler = tokio::spawn(run_scheduler(
        registry,
        health_registry.clone(),
        metrics,
        logger.clone(),
        config.check_interval_secs,
    ));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    scheduler.abort();
    api_handle.abort();

    Ok(())
}

/// Periodic trigger loop
///
/// A failed pass degrades the checker component and waits for the next
/// tick; the agent process stays up.
async fn run_scheduler(
    registry: Arc<CheckRegistry>,
    health: HealthRegistry,
    metrics: CheckMetrics,
    logger: CheckLogger,
    interval_secs: u64,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;
        let start = Instant::now();

        match registry.dispatch(&Trigger::Scheduled).await {
            Ok(emitted) => {
                let elapsed = start.elapsed().as_secs_f64();
                metrics.inc_passes();
                metrics.add_findings_emitted(emitted);
                metrics.observe_pass_latency(elapsed);
                health.set_healthy(components::CHECKER).await;
                logger.log_pass("scheduled", emitted, elapsed);
            }
            Err(err) => {
                metrics.inc_check_errors();
                health
                    .set_degraded(components::CHECKER, err.to_string())
                    .await;
                logger.log_pass_error("scheduled", &err.to_string());
            }
        }
    }
}
