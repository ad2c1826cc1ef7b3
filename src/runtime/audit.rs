//! Reorder lifecycle audit hooks.
//!
//! The runtime reports each state transition of the ordering engine as a
//! stage record with structured details, so callers can buffer or visualize
//! the session history without reaching into the dispatch loop.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Distinct checkpoints emitted by `ShellRuntime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAuditStage {
    /// Runtime constructed from a registry.
    RuntimeConstructed,
    /// Reorder mode entered from the committed order.
    SessionEntered,
    /// A drag release re-tagged the working order.
    DragApplied,
    /// A malformed drag release was discarded.
    DragRejected,
    /// Done pressed; the new order was committed.
    SessionCommitted,
    /// Reset token changed; edits discarded.
    SessionReset,
    /// The active navigation entry vanished and the first entry took over.
    SelectionFallback,
    DrilldownOpened,
    DrilldownClosed,
}

#[derive(Debug, Clone)]
pub struct ShellAuditEvent {
    pub timestamp: SystemTime,
    pub stage: ShellAuditStage,
    pub details: Vec<(String, Value)>,
}

impl ShellAuditEvent {
    fn new(stage: ShellAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

pub struct ShellAuditEventBuilder {
    event: ShellAuditEvent,
}

impl ShellAuditEventBuilder {
    pub fn new(stage: ShellAuditStage) -> Self {
        Self {
            event: ShellAuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> ShellAuditEvent {
        self.event
    }
}

pub trait ShellAudit: Send + Sync {
    fn record(&self, event: ShellAuditEvent);
}

#[derive(Debug, Default)]
pub struct NullShellAudit;

impl ShellAudit for NullShellAudit {
    fn record(&self, _event: ShellAuditEvent) {}
}

/// Keeps every record in arrival order.
#[derive(Debug, Default)]
pub struct BufferedShellAudit {
    events: Mutex<Vec<ShellAuditEvent>>,
}

impl BufferedShellAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> Vec<ShellAuditStage> {
        self.events
            .lock()
            .map(|events| events.iter().map(|e| e.stage).collect())
            .unwrap_or_default()
    }

    pub fn events(&self) -> Vec<ShellAuditEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ShellAudit for BufferedShellAudit {
    fn record(&self, event: ShellAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_collects_details() {
        let audit = BufferedShellAudit::new();
        audit.record(
            ShellAuditEventBuilder::new(ShellAuditStage::DragRejected)
                .detail("reason", "expected 8 items, got 0")
                .finish(),
        );
        let events = audit.events();
        assert_eq!(audit.stages(), vec![ShellAuditStage::DragRejected]);
        assert_eq!(
            events[0].detail("reason"),
            Some(&json!("expected 8 items, got 0"))
        );
    }
}
