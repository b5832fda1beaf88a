//! Finding emission
//!
//! The sink is the boundary to the downstream alerting pipeline. Delivery,
//! cross-pass deduplication, and notification routing all live on the other
//! side of it.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::warn;

use crate::error::{CheckError, Result};
use crate::findings::Finding;

#[async_trait]
pub trait FindingSink: Send + Sync {
    async fn emit(&self, finding: Finding) -> Result<()>;
}

/// Default sink: each finding becomes a structured warn-level log event
pub struct LogSink;

#[async_trait]
impl FindingSink for LogSink {
    async fn emit(&self, finding: Finding) -> Result<()> {
        warn!(
            event = "finding_emitted",
            title = %finding.title,
            severity = %finding.severity,
            source = %finding.source,
            aggregation_key = %finding.aggregation_key,
            "{}",
            finding.description
        );
        Ok(())
    }
}

/// Sink that POSTs each finding as JSON to an HTTP endpoint
pub struct WebhookSink {
    endpoint: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FindingSink for WebhookSink {
    async fn emit(&self, finding: Finding) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&finding)
            .send()
            .await
            .map_err(|e| CheckError::Sink(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CheckError::Sink(format!(
                "webhook returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// In-memory sink capturing every emitted finding, for tests
#[derive(Default)]
pub struct MemorySink {
    findings: Mutex<Vec<Finding>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the findings emitted so far
    pub fn findings(&self) -> Vec<Finding> {
        self.findings.lock().unwrap().clone()
    }

    /// Drain the captured findings
    pub fn take(&self) -> Vec<Finding> {
        std::mem::take(&mut *self.findings.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.findings.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FindingSink for MemorySink {
    async fn emit(&self, finding: Finding) -> Result<()> {
        self.findings.lock().unwrap().push(finding);
        Ok(())
    }
}
