//! Agent configuration

use anyhow::Result;
use serde::Deserialize;

/// Check agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CheckerConfig {
    /// Namespace all checks run against
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Pod name prefixes to watch (comma separated in env form)
    #[serde(default)]
    pub pod_prefixes: Vec<String>,

    /// HorizontalPodAutoscaler names to watch
    #[serde(default)]
    pub hpa_names: Vec<String>,

    /// Period of the scheduled evaluation pass in seconds
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// API server port for health/metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Webhook endpoint for findings; findings go to the log when unset
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Whether to stream pod lifecycle events as triggers
    #[serde(default = "default_watch_pods")]
    pub watch_pods: bool,
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_check_interval() -> u64 {
    60
}

fn default_api_port() -> u16 {
    8080
}

fn default_watch_pods() -> bool {
    true
}

impl CheckerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("CHECKER")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("pod_prefixes")
                    .with_list_parse_key("hpa_names"),
            )
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| CheckerConfig {
            namespace: default_namespace(),
            pod_prefixes: Vec::new(),
            hpa_names: Vec::new(),
            check_interval_secs: default_check_interval(),
            api_port: default_api_port(),
            webhook_url: None,
            watch_pods: default_watch_pods(),
        }))
    }
}
