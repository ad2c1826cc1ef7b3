use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::logging::{event_with_fields, json_kv};
use crate::navigation::{MORE_ENTRY_KEY, NavigationPresenter, SelectionFallback};
use crate::ordering::OrderingStore;
use crate::registry::{Item, ItemKey, ItemRegistry};
use crate::session::{DragOutcome, ReorderSession, ToggleOutcome};
use crate::zone::ZoneTaggedItem;
use crate::{AnsiRenderer, LogLevel, Logger, RendererSettings, Result, ShellMetrics};

pub mod audit;
pub mod driver;
pub mod frame;

use audit::{ShellAudit, ShellAuditEventBuilder, ShellAuditStage};
use frame::{GridTile, NavCell, ScreenFrame, ShellFrame};

const RUNTIME_TARGET: &str = "shell::runtime";

/// Configuration knobs for the shell runtime.
#[derive(Clone)]
pub struct ShellConfig {
    /// Shortcut slot count. `None` uses the registry's default shortcut count.
    pub shortcut_count: Option<usize>,
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<ShellMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    /// Optional lifecycle audit sink.
    pub audit: Option<Arc<dyn ShellAudit>>,
    pub renderer: RendererSettings,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            shortcut_count: None,
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "shell::runtime.metrics".to_string(),
            audit: None,
            renderer: RendererSettings::default(),
        }
    }
}

impl ShellConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(ShellMetrics::new())));
        }
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<ShellMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Input events from the interaction layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Tap on a navigation strip entry (a shortcut key or the More entry).
    SelectNav(ItemKey),
    /// "Reorder" / "Done" on the More screen.
    ToggleReorder,
    /// The grid settled after a drag; carries the full reported order.
    DragRelease(Vec<ItemKey>),
    /// Tap on a More grid tile while not reordering.
    SelectItem(ItemKey),
    /// Back out of an opened item.
    CloseDrilldown,
}

impl ShellEvent {
    fn describe(&self) -> &'static str {
        match self {
            ShellEvent::SelectNav(_) => "select_nav",
            ShellEvent::ToggleReorder => "toggle_reorder",
            ShellEvent::DragRelease(_) => "drag_release",
            ShellEvent::SelectItem(_) => "select_item",
            ShellEvent::CloseDrilldown => "close_drilldown",
        }
    }

    fn targets_more_screen(&self) -> bool {
        !matches!(self, ShellEvent::SelectNav(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    /// The event changed state.
    Applied,
    /// The event did not apply to the current screen or state.
    Ignored,
    /// A malformed drag release was discarded.
    Rejected,
}

/// Owns the registry, master order, navigation strip and reorder session, and
/// routes user events between them. Handlers run to completion one at a time.
pub struct ShellRuntime {
    registry: ItemRegistry,
    store: OrderingStore,
    presenter: NavigationPresenter,
    session: ReorderSession,
    renderer: AnsiRenderer,
    config: ShellConfig,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl ShellRuntime {
    pub fn new(registry: ItemRegistry) -> Result<Self> {
        Self::with_config(registry, ShellConfig::default())
    }

    pub fn with_config(registry: ItemRegistry, config: ShellConfig) -> Result<Self> {
        let shortcut_count = config
            .shortcut_count
            .unwrap_or_else(|| registry.default_shortcut_count());
        let store = OrderingStore::from_registry(&registry, shortcut_count)?;
        let presenter = NavigationPresenter::new(&store);
        let session = ReorderSession::new(&store, presenter.reset_token());
        let renderer = AnsiRenderer::new(config.renderer.clone());

        let runtime = Self {
            registry,
            store,
            presenter,
            session,
            renderer,
            config,
            start_instant: None,
            last_metrics_emit: None,
        };
        runtime.audit(
            ShellAuditEventBuilder::new(ShellAuditStage::RuntimeConstructed)
                .detail("items", runtime.store.len())
                .detail("shortcut_count", shortcut_count),
        );
        Ok(runtime)
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ShellConfig {
        &mut self.config
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    pub fn store(&self) -> &OrderingStore {
        &self.store
    }

    pub fn presenter(&self) -> &NavigationPresenter {
        &self.presenter
    }

    pub fn session(&self) -> &ReorderSession {
        &self.session
    }

    pub fn renderer_settings(&self) -> &RendererSettings {
        self.renderer.settings()
    }

    pub fn renderer_settings_mut(&mut self) -> &mut RendererSettings {
        self.renderer.settings_mut()
    }

    pub fn master_order(&self) -> &[Item] {
        self.store.master_order()
    }

    pub fn shortcut_view(&self) -> &[Item] {
        self.store.shortcut_view()
    }

    pub fn overflow_view(&self) -> &[Item] {
        self.store.overflow_view()
    }

    pub fn working_order_for_display(&self) -> Option<&[ZoneTaggedItem]> {
        self.session.working_order_for_display()
    }

    pub fn active_selection(&self) -> &str {
        self.presenter.active_selection()
    }

    pub fn drilldown_target(&self) -> Option<&str> {
        self.session.drilldown_target()
    }

    pub fn dispatch(&mut self, event: ShellEvent) -> Result<EventFlow> {
        let outcome = self.route(&event);
        let flow_label = match &outcome {
            Ok(flow) => format!("{flow:?}").to_lowercase(),
            Err(_) => "failed".to_string(),
        };

        self.record_metric(|m| {
            m.record_event();
            if matches!(outcome, Ok(EventFlow::Ignored)) {
                m.record_ignored();
            }
        });
        let mut fields = vec![
            json_kv("event", event.describe()),
            json_kv("flow", flow_label),
            json_kv("active", self.presenter.active_selection()),
            json_kv("revision", self.store.revision()),
        ];
        if let Err(err) = &outcome {
            fields.push(json_kv("error", err.to_string()));
        }
        self.log_runtime_event(LogLevel::Debug, "event_dispatched", fields);
        self.maybe_emit_metrics();
        outcome
    }

    fn route(&mut self, event: &ShellEvent) -> Result<EventFlow> {
        if event.targets_more_screen() && !self.presenter.is_more_active() {
            return Ok(EventFlow::Ignored);
        }
        match event {
            ShellEvent::SelectNav(key) => self.handle_select_nav(key),
            ShellEvent::ToggleReorder => self.handle_toggle(),
            ShellEvent::DragRelease(candidate) => Ok(self.handle_drag(candidate)),
            ShellEvent::SelectItem(key) => self.handle_select_item(key),
            ShellEvent::CloseDrilldown => Ok(self.handle_close_drilldown()),
        }
    }

    fn handle_select_nav(&mut self, key: &str) -> Result<EventFlow> {
        let selection = self.presenter.select(key)?;
        if let Some(token) = selection.reset_token {
            self.observe_reset_token(token);
        }
        Ok(EventFlow::Applied)
    }

    fn handle_toggle(&mut self) -> Result<EventFlow> {
        match self.session.toggle_reorder(&mut self.store)? {
            ToggleOutcome::Entered => {
                self.record_metric(ShellMetrics::record_session_started);
                self.log_runtime_event(
                    LogLevel::Info,
                    "reorder_entered",
                    [json_kv("items", self.session.working_order().len())],
                );
                self.audit(ShellAuditEventBuilder::new(ShellAuditStage::SessionEntered));
            }
            ToggleOutcome::Committed { shortcuts } => {
                self.record_metric(ShellMetrics::record_commit);
                self.log_runtime_event(
                    LogLevel::Info,
                    "reorder_committed",
                    [
                        json_kv("shortcuts", shortcuts.clone()),
                        json_kv("revision", self.store.revision()),
                    ],
                );
                self.audit(
                    ShellAuditEventBuilder::new(ShellAuditStage::SessionCommitted)
                        .detail("shortcuts", shortcuts),
                );
                self.sync_navigation();
            }
        }
        Ok(EventFlow::Applied)
    }

    fn handle_drag(&mut self, candidate: &[ItemKey]) -> EventFlow {
        match self.session.drag_release(candidate) {
            DragOutcome::Applied(changes) => {
                self.record_metric(|m| m.record_drag(true));
                self.log_runtime_event(
                    LogLevel::Debug,
                    "drag_applied",
                    [
                        json_kv("promoted", changes.promoted.clone()),
                        json_kv("demoted", changes.demoted.clone()),
                    ],
                );
                self.audit(
                    ShellAuditEventBuilder::new(ShellAuditStage::DragApplied)
                        .detail("promoted", changes.promoted)
                        .detail("demoted", changes.demoted),
                );
                EventFlow::Applied
            }
            DragOutcome::Unchanged => EventFlow::Ignored,
            DragOutcome::Rejected(rejection) => {
                self.record_metric(|m| m.record_drag(false));
                self.log_runtime_event(
                    LogLevel::Warn,
                    "drag_rejected",
                    [
                        json_kv("reason", rejection.to_string()),
                        json_kv("candidate_len", candidate.len()),
                    ],
                );
                self.audit(
                    ShellAuditEventBuilder::new(ShellAuditStage::DragRejected)
                        .detail("reason", rejection.to_string()),
                );
                EventFlow::Rejected
            }
        }
    }

    fn handle_select_item(&mut self, key: &str) -> Result<EventFlow> {
        // Tiles are drag handles while reordering.
        if self.session.is_reordering() {
            return Ok(EventFlow::Ignored);
        }
        self.session.select_item(key)?;
        self.audit(ShellAuditEventBuilder::new(ShellAuditStage::DrilldownOpened).detail("key", key));
        Ok(EventFlow::Applied)
    }

    fn handle_close_drilldown(&mut self) -> EventFlow {
        match self.session.close_drilldown() {
            Some(key) => {
                self.audit(
                    ShellAuditEventBuilder::new(ShellAuditStage::DrilldownClosed).detail("key", key),
                );
                EventFlow::Applied
            }
            None => EventFlow::Ignored,
        }
    }

    fn observe_reset_token(&mut self, token: u64) {
        if !self.session.sync_reset_token(token, &self.store) {
            return;
        }
        self.record_metric(ShellMetrics::record_reset);
        self.log_runtime_event(
            LogLevel::Info,
            "reorder_reset",
            [
                json_kv("reset_token", token),
                json_kv("revision", self.store.revision()),
            ],
        );
        self.audit(ShellAuditEventBuilder::new(ShellAuditStage::SessionReset).detail("reset_token", token));
    }

    fn sync_navigation(&mut self) {
        if let Some(SelectionFallback { previous, current }) = self.presenter.sync(&self.store) {
            self.record_metric(ShellMetrics::record_selection_fallback);
            self.log_runtime_event(
                LogLevel::Debug,
                "selection_fallback",
                [
                    json_kv("previous", previous.clone()),
                    json_kv("current", current.clone()),
                ],
            );
            self.audit(
                ShellAuditEventBuilder::new(ShellAuditStage::SelectionFallback)
                    .detail("previous", previous)
                    .detail("current", current),
            );
        }
    }

    /// Snapshot of what should be on screen right now.
    pub fn frame(&self) -> ShellFrame {
        let active = self.presenter.active_selection();
        let nav = self
            .presenter
            .strip()
            .iter()
            .map(|entry| NavCell {
                key: entry.key.clone(),
                label: entry.label.clone(),
                active: entry.key == active,
            })
            .collect();

        let screen = if active != MORE_ENTRY_KEY {
            ScreenFrame::Item {
                key: active.to_string(),
                content: self.render_item(active),
            }
        } else if let Some(key) = self.session.drilldown_target() {
            ScreenFrame::Drilldown {
                key: key.to_string(),
                content: self.render_item(key),
            }
        } else if let Some(grid) = self.session.working_order_for_display() {
            ScreenFrame::More {
                reordering: true,
                tiles: grid
                    .iter()
                    .map(|entry| GridTile {
                        key: entry.item.key.clone(),
                        label: entry.item.label.clone(),
                        zone: Some(entry.zone),
                    })
                    .collect(),
            }
        } else {
            ScreenFrame::More {
                reordering: false,
                tiles: self
                    .session
                    .overflow_items()
                    .map(|item| GridTile {
                        key: item.key.clone(),
                        label: item.label.clone(),
                        zone: None,
                    })
                    .collect(),
            }
        };

        ShellFrame {
            nav,
            screen,
            overlay: Default::default(),
        }
    }

    fn render_item(&self, key: &str) -> String {
        self.registry
            .get(key)
            .map(|item| item.renderable.render())
            .unwrap_or_default()
    }

    pub fn render_frame(&mut self, writer: &mut impl Write, frame: &ShellFrame) -> Result<()> {
        self.renderer.render(writer, frame)
    }

    /// Dispatch a fixed event list, rendering after each event.
    pub fn run_scripted<I>(&mut self, writer: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = ShellEvent>,
    {
        self.start();
        let frame = self.frame();
        self.render_frame(writer, &frame)?;
        for event in events {
            self.dispatch(event)?;
            let frame = self.frame();
            self.render_frame(writer, &frame)?;
        }
        self.stop();
        Ok(())
    }

    pub fn start(&mut self) {
        if self.config.metrics.is_none() && self.config.metrics_interval > Duration::ZERO {
            self.config.enable_metrics();
        }
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("items", self.store.len()),
                json_kv("shortcut_count", self.store.shortcut_count()),
            ],
        );
    }

    pub fn stop(&mut self) {
        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis() as u64)
            .unwrap_or(0);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_stopped",
            [
                json_kv("uptime_ms", uptime_ms),
                json_kv("revision", self.store.revision()),
            ],
        );
    }

    pub fn log_runtime_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            if !logger.enabled(level) {
                return;
            }
            let event = event_with_fields(level, RUNTIME_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn audit(&self, builder: ShellAuditEventBuilder) {
        if let Some(audit) = self.config.audit.as_ref() {
            audit.record(builder.finish());
        }
    }

    fn record_metric(&self, record: impl FnOnce(&mut ShellMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut *guard);
            }
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() || self.config.metrics_interval == Duration::ZERO {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => {
                return;
            }
            _ => {
                self.last_metrics_emit = Some(now);
            }
        }

        let uptime = self
            .start_instant
            .map(|start| now.duration_since(start))
            .unwrap_or_default();

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let event = guard
                    .snapshot(uptime)
                    .to_log_event(&self.config.metrics_target);
                let _ = logger.log_event(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::audit::BufferedShellAudit;
    use super::*;
    use crate::ShellError;
    use crate::logging::MemorySink;
    use crate::session::SessionState;
    use crate::zone::Zone;

    fn letters_registry() -> ItemRegistry {
        let item = |k: &str| Item::new(k, k.to_uppercase());
        ItemRegistry::from_parts(
            ["a", "b", "c"].into_iter().map(item).collect(),
            ["d", "e", "f", "g", "h"].into_iter().map(item).collect(),
        )
        .unwrap()
    }

    fn keys(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.key.as_str()).collect()
    }

    fn strings(keys: &[&str]) -> Vec<ItemKey> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    fn more() -> ShellEvent {
        ShellEvent::SelectNav(MORE_ENTRY_KEY.to_string())
    }

    #[test]
    fn full_reorder_scenario() {
        let mut runtime = ShellRuntime::new(letters_registry()).unwrap();
        assert_eq!(keys(runtime.shortcut_view()), vec!["a", "b", "c"]);
        assert_eq!(keys(runtime.overflow_view()), vec!["d", "e", "f", "g", "h"]);

        runtime.dispatch(more()).unwrap();
        assert_eq!(runtime.dispatch(ShellEvent::ToggleReorder).unwrap(), EventFlow::Applied);
        let grid = runtime.working_order_for_display().unwrap();
        assert_eq!(grid.iter().filter(|t| t.zone == Zone::Overflow).count(), 5);

        let candidate = strings(&["d", "e", "f", "g", "a", "h", "b", "c"]);
        assert_eq!(
            runtime.dispatch(ShellEvent::DragRelease(candidate)).unwrap(),
            EventFlow::Applied
        );
        runtime.dispatch(ShellEvent::ToggleReorder).unwrap();

        assert_eq!(
            keys(runtime.master_order()),
            vec!["d", "e", "f", "g", "a", "h", "b", "c"]
        );
        assert_eq!(keys(runtime.shortcut_view()), vec!["h", "b", "c"]);
        assert_eq!(runtime.session().state(), SessionState::Idle);
        assert!(runtime.working_order_for_display().is_none());
    }

    #[test]
    fn reselecting_more_discards_uncommitted_edits() {
        let mut runtime = ShellRuntime::new(letters_registry()).unwrap();
        let before = runtime.master_order().to_vec();

        runtime.dispatch(more()).unwrap();
        runtime.dispatch(ShellEvent::ToggleReorder).unwrap();
        runtime
            .dispatch(ShellEvent::DragRelease(strings(&[
                "c", "d", "e", "f", "g", "h", "a", "b",
            ])))
            .unwrap();
        runtime.dispatch(more()).unwrap();

        assert_eq!(runtime.master_order(), &before[..]);
        assert!(!runtime.session().is_reordering());
        assert_eq!(runtime.presenter().reset_token(), 2);
    }

    #[test]
    fn leaving_more_then_returning_resets() {
        let mut runtime = ShellRuntime::new(letters_registry()).unwrap();
        runtime.dispatch(more()).unwrap();
        runtime.dispatch(ShellEvent::ToggleReorder).unwrap();
        runtime.dispatch(ShellEvent::SelectNav("b".into())).unwrap();
        assert_eq!(
            runtime.dispatch(ShellEvent::ToggleReorder).unwrap(),
            EventFlow::Ignored
        );
        runtime.dispatch(more()).unwrap();
        assert!(!runtime.session().is_reordering());
    }

    #[test]
    fn selecting_more_twice_keeps_order() {
        let mut runtime = ShellRuntime::new(letters_registry()).unwrap();
        let master = runtime.master_order().to_vec();
        let bar = runtime.shortcut_view().to_vec();
        let overflow = runtime.overflow_view().to_vec();

        runtime.dispatch(more()).unwrap();
        runtime.dispatch(more()).unwrap();

        assert_eq!(runtime.master_order(), &master[..]);
        assert_eq!(runtime.shortcut_view(), &bar[..]);
        assert_eq!(runtime.overflow_view(), &overflow[..]);
    }

    #[test]
    fn malformed_drag_is_rejected_not_raised() {
        let sink = MemorySink::new();
        let config = ShellConfig {
            logger: Some(Logger::new(sink.clone())),
            ..ShellConfig::default()
        };
        let mut runtime = ShellRuntime::with_config(letters_registry(), config).unwrap();
        runtime.dispatch(more()).unwrap();
        runtime.dispatch(ShellEvent::ToggleReorder).unwrap();
        let before = runtime.session().working_order().to_vec();

        let flow = runtime.dispatch(ShellEvent::DragRelease(Vec::new())).unwrap();
        assert_eq!(flow, EventFlow::Rejected);
        assert_eq!(runtime.session().working_order(), &before[..]);

        let rejected: Vec<_> = sink
            .events()
            .into_iter()
            .filter(|e| e.message == "drag_rejected")
            .collect();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].level, LogLevel::Warn);
    }

    #[test]
    fn commit_rebuilds_strip_and_keeps_more_active() {
        let audit = Arc::new(BufferedShellAudit::new());
        let config = ShellConfig {
            audit: Some(audit.clone()),
            ..ShellConfig::default()
        };
        let mut runtime = ShellRuntime::with_config(letters_registry(), config).unwrap();
        assert_eq!(runtime.active_selection(), "a");

        runtime.dispatch(more()).unwrap();
        runtime.dispatch(ShellEvent::ToggleReorder).unwrap();
        runtime
            .dispatch(ShellEvent::DragRelease(strings(&[
                "a", "d", "e", "f", "g", "h", "b", "c",
            ])))
            .unwrap();
        runtime.dispatch(ShellEvent::ToggleReorder).unwrap();

        let strip: Vec<_> = runtime
            .presenter()
            .strip()
            .iter()
            .map(|e| e.key.as_str())
            .collect();
        assert_eq!(strip, vec!["h", "b", "c", MORE_ENTRY_KEY]);
        assert_eq!(runtime.active_selection(), MORE_ENTRY_KEY);
        assert!(audit.stages().contains(&ShellAuditStage::SessionCommitted));
    }

    #[test]
    fn drilldown_opens_and_closes() {
        let mut runtime = ShellRuntime::new(ItemRegistry::builtin().unwrap()).unwrap();
        runtime.dispatch(more()).unwrap();
        runtime
            .dispatch(ShellEvent::SelectItem("contacts".into()))
            .unwrap();
        assert_eq!(runtime.drilldown_target(), Some("contacts"));
        match runtime.frame().screen {
            ScreenFrame::Drilldown { key, content } => {
                assert_eq!(key, "contacts");
                assert!(content.starts_with("Contacts"));
            }
            other => panic!("unexpected screen {other:?}"),
        }

        assert_eq!(
            runtime.dispatch(ShellEvent::CloseDrilldown).unwrap(),
            EventFlow::Applied
        );
        assert_eq!(
            runtime.dispatch(ShellEvent::CloseDrilldown).unwrap(),
            EventFlow::Ignored
        );
    }

    #[test]
    fn shortcut_item_cannot_be_opened_from_more() {
        let mut runtime = ShellRuntime::new(letters_registry()).unwrap();
        runtime.dispatch(more()).unwrap();
        assert!(runtime.dispatch(ShellEvent::SelectItem("a".into())).is_err());
    }

    #[test]
    fn tap_during_reorder_is_ignored() {
        let mut runtime = ShellRuntime::new(letters_registry()).unwrap();
        runtime.dispatch(more()).unwrap();
        runtime.dispatch(ShellEvent::ToggleReorder).unwrap();

        let flow = runtime.dispatch(ShellEvent::SelectItem("d".into())).unwrap();
        assert_eq!(flow, EventFlow::Ignored);
        assert_eq!(runtime.drilldown_target(), None);
        assert!(runtime.session().is_reordering());
    }

    #[test]
    fn failed_event_is_counted_and_logged() {
        let sink = MemorySink::new();
        let mut config = ShellConfig {
            logger: Some(Logger::new(sink.clone())),
            metrics_interval: Duration::ZERO,
            ..ShellConfig::default()
        };
        config.enable_metrics();
        let metrics = config.metrics_handle().unwrap();
        let mut runtime = ShellRuntime::with_config(letters_registry(), config).unwrap();

        let result = runtime.dispatch(ShellEvent::SelectNav("nope".into()));
        assert!(matches!(result, Err(ShellError::UnknownNavEntry(_))));

        assert_eq!(metrics.lock().unwrap().snapshot(Duration::ZERO).events, 1);
        let dispatched: Vec<_> = sink
            .events()
            .into_iter()
            .filter(|e| e.message == "event_dispatched")
            .collect();
        assert_eq!(dispatched.len(), 1);
        assert_eq!(dispatched[0].field("flow"), Some(&serde_json::json!("failed")));
        assert!(dispatched[0].field("error").is_some());
    }

    #[test]
    fn frame_reflects_screen_state() {
        let mut runtime = ShellRuntime::new(letters_registry()).unwrap();
        let frame = runtime.frame();
        assert_eq!(frame.active_nav().map(|c| c.key.as_str()), Some("a"));
        assert!(matches!(frame.screen, ScreenFrame::Item { ref key, .. } if key == "a"));

        runtime.dispatch(more()).unwrap();
        let idle = runtime.frame();
        assert_eq!(idle.tiles().len(), 5);
        assert!(idle.tiles().iter().all(|t| t.zone.is_none()));

        runtime.dispatch(ShellEvent::ToggleReorder).unwrap();
        let editing = runtime.frame();
        assert_eq!(editing.tiles().len(), 8);
        assert_eq!(editing.tiles()[7].zone, Some(Zone::Shortcut));
    }

    #[test]
    fn configured_shortcut_count_overrides_registry() {
        let config = ShellConfig {
            shortcut_count: Some(2),
            ..ShellConfig::default()
        };
        let runtime = ShellRuntime::with_config(letters_registry(), config).unwrap();
        assert_eq!(keys(runtime.shortcut_view()), vec!["b", "c"]);
    }

    #[test]
    fn scripted_run_renders_and_counts() {
        let sink = MemorySink::new();
        let mut config = ShellConfig {
            logger: Some(Logger::new(sink.clone())),
            metrics_interval: Duration::ZERO,
            ..ShellConfig::default()
        };
        config.enable_metrics();
        let metrics = config.metrics_handle().unwrap();
        let mut runtime = ShellRuntime::with_config(letters_registry(), config).unwrap();

        let mut output = Vec::new();
        runtime
            .run_scripted(
                &mut output,
                [more(), ShellEvent::ToggleReorder, ShellEvent::ToggleReorder],
            )
            .unwrap();
        assert!(!output.is_empty());

        let snapshot = metrics.lock().unwrap().snapshot(Duration::ZERO);
        assert_eq!(snapshot.events, 3);
        assert_eq!(snapshot.sessions_started, 1);
        assert_eq!(snapshot.commits, 1);
        assert_eq!(snapshot.resets, 1);

        let messages = sink.messages();
        assert_eq!(messages.first().map(String::as_str), Some("runtime_started"));
        assert_eq!(messages.last().map(String::as_str), Some("runtime_stopped"));
    }
}
