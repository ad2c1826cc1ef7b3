use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct ShellMetrics {
    events: u64,
    ignored_events: u64,
    sessions_started: u64,
    drags_applied: u64,
    drags_rejected: u64,
    commits: u64,
    resets: u64,
    selection_fallbacks: u64,
}

impl ShellMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_ignored(&mut self) {
        self.ignored_events = self.ignored_events.saturating_add(1);
    }

    pub fn record_session_started(&mut self) {
        self.sessions_started = self.sessions_started.saturating_add(1);
    }

    pub fn record_drag(&mut self, applied: bool) {
        if applied {
            self.drags_applied = self.drags_applied.saturating_add(1);
        } else {
            self.drags_rejected = self.drags_rejected.saturating_add(1);
        }
    }

    pub fn record_commit(&mut self) {
        self.commits = self.commits.saturating_add(1);
    }

    pub fn record_reset(&mut self) {
        self.resets = self.resets.saturating_add(1);
    }

    pub fn record_selection_fallback(&mut self) {
        self.selection_fallbacks = self.selection_fallbacks.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            ignored_events: self.ignored_events,
            sessions_started: self.sessions_started,
            drags_applied: self.drags_applied,
            drags_rejected: self.drags_rejected,
            commits: self.commits,
            resets: self.resets,
            selection_fallbacks: self.selection_fallbacks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub ignored_events: u64,
    pub sessions_started: u64,
    pub drags_applied: u64,
    pub drags_rejected: u64,
    pub commits: u64,
    pub resets: u64,
    pub selection_fallbacks: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "shell_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("events".to_string(), json!(self.events));
        map.insert("ignored_events".to_string(), json!(self.ignored_events));
        map.insert("sessions_started".to_string(), json!(self.sessions_started));
        map.insert("drags_applied".to_string(), json!(self.drags_applied));
        map.insert("drags_rejected".to_string(), json!(self.drags_rejected));
        map.insert("commits".to_string(), json!(self.commits));
        map.insert("resets".to_string(), json!(self.resets));
        map.insert(
            "selection_fallbacks".to_string(),
            json!(self.selection_fallbacks),
        );
        map
    }
}
