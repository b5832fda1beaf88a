//! Explicit trigger-to-check registration
//!
//! Handlers are bound to a trigger kind when the process starts. Dispatching
//! a trigger runs every handler bound to its kind in registration order,
//! run-to-completion, and stops at the first error.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;

/// Cause of a check invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Periodic timer tick
    Scheduled,
    /// A pod lifecycle event
    PodEvent { name: String, namespace: String },
    /// A namespace-scoped change event; the payload is only a signal
    KubeChange { namespace: String },
}

/// Registry key discriminant of a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    Scheduled,
    PodEvent,
    KubeChange,
}

impl Trigger {
    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::Scheduled => TriggerKind::Scheduled,
            Trigger::PodEvent { .. } => TriggerKind::PodEvent,
            Trigger::KubeChange { .. } => TriggerKind::KubeChange,
        }
    }
}

/// Boxed async check handler; returns the number of findings it emitted
pub type CheckHandler = Arc<
    dyn Fn(Trigger) -> Pin<Box<dyn Future<Output = Result<usize>> + Send>> + Send + Sync,
>;

/// Map from trigger kind to the handlers bound to it
#[derive(Default)]
pub struct CheckRegistry {
    handlers: HashMap<TriggerKind, Vec<(String, CheckHandler)>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a named handler to a trigger kind
    pub fn register(&mut self, kind: TriggerKind, name: impl Into<String>, handler: CheckHandler) {
        self.handlers.entry(kind).or_default().push((name.into(), handler));
    }

    /// Number of handlers bound to a kind
    pub fn handler_count(&self, kind: TriggerKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Run every handler bound to the trigger's kind
    ///
    /// Returns the total number of findings emitted across handlers. The
    /// first handler error aborts the pass.
    pub async fn dispatch(&self, trigger: &Trigger) -> Result<usize> {
        let mut emitted = 0;

        if let Some(handlers) = self.handlers.get(&trigger.kind()) {
            for (name, handler) in handlers {
                debug!(handler = %name, kind = ?trigger.kind(), "Dispatching check");
                emitted += handler(trigger.clone()).await?;
            }
        }

        Ok(emitted)
    }
}
