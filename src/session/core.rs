use std::collections::HashMap;

use thiserror::Error;

use crate::error::{Result, ShellError};
use crate::ordering::{ApplyReorder, OrderingStore};
use crate::registry::{Item, ItemKey};
use crate::zone::{Zone, ZoneTaggedItem, classify, declassify, split_by_zone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Reordering,
}

/// Why a drag release was discarded. The working order is untouched in every
/// case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragRejection {
    #[error("no reorder session is active")]
    NotReordering,
    #[error("expected {expected} items, got {actual}")]
    Cardinality { expected: usize, actual: usize },
    #[error("item `{0}` is not part of this session")]
    UnknownKey(String),
    #[error("item `{0}` appears more than once")]
    DuplicateKey(String),
}

/// Items whose zone flipped because of a drag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneChanges {
    pub promoted: Vec<ItemKey>,
    pub demoted: Vec<ItemKey>,
}

impl ZoneChanges {
    pub fn is_empty(&self) -> bool {
        self.promoted.is_empty() && self.demoted.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    Applied(ZoneChanges),
    Unchanged,
    Rejected(DragRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Entered,
    Committed { shortcuts: Vec<ItemKey> },
}

/// Interactive reorder state for the "More" screen.
///
/// Idle shows the overflow grid and allows opening items. Reordering shows
/// every item on one combined grid (overflow first, shortcuts last) and
/// re-tags zones from position after every drag release. Leaving Reordering
/// commits through [`ApplyReorder`]; an external reset token change throws the
/// edit away.
#[derive(Debug, Clone)]
pub struct ReorderSession {
    state: SessionState,
    shortcut_count: usize,
    working_order: Vec<ZoneTaggedItem>,
    reset_token: u64,
    drilldown: Option<ItemKey>,
}

impl ReorderSession {
    pub fn new(store: &OrderingStore, reset_token: u64) -> Self {
        Self {
            state: SessionState::Idle,
            shortcut_count: store.shortcut_count(),
            working_order: combined_view(store),
            reset_token,
            drilldown: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_reordering(&self) -> bool {
        self.state == SessionState::Reordering
    }

    pub fn working_order(&self) -> &[ZoneTaggedItem] {
        &self.working_order
    }

    /// The zone-tagged grid, only while a reorder is in progress.
    pub fn working_order_for_display(&self) -> Option<&[ZoneTaggedItem]> {
        self.is_reordering().then_some(self.working_order.as_slice())
    }

    /// Items the idle grid shows.
    pub fn overflow_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.working_order
            .iter()
            .filter(|entry| entry.zone == Zone::Overflow)
            .map(|entry| &entry.item)
    }

    pub fn drilldown_target(&self) -> Option<&str> {
        self.drilldown.as_deref()
    }

    pub fn reset_token(&self) -> u64 {
        self.reset_token
    }

    /// Start editing from the committed order.
    pub fn enter(&mut self, store: &OrderingStore) {
        self.shortcut_count = store.shortcut_count();
        self.working_order = combined_view(store);
        self.state = SessionState::Reordering;
    }

    /// The "Reorder" / "Done" button.
    pub fn toggle_reorder(&mut self, store: &mut OrderingStore) -> Result<ToggleOutcome> {
        match self.state {
            SessionState::Idle => {
                self.enter(store);
                Ok(ToggleOutcome::Entered)
            }
            SessionState::Reordering => {
                let shortcuts = self.finish(store)?;
                Ok(ToggleOutcome::Committed { shortcuts })
            }
        }
    }

    /// Split the working order by zone and hand it to `target`. On failure the
    /// session stays in Reordering with its edits intact.
    pub fn finish<A>(&mut self, target: &mut A) -> Result<Vec<ItemKey>>
    where
        A: ApplyReorder + ?Sized,
    {
        let (overflow, shortcuts) = split_by_zone(self.working_order.iter().cloned());
        let shortcut_keys = shortcuts.iter().map(|item| item.key.clone()).collect();
        target.apply_reorder(shortcuts, overflow)?;

        let committed = declassify(std::mem::take(&mut self.working_order));
        self.working_order = classify(committed, self.shortcut_count);
        self.state = SessionState::Idle;
        Ok(shortcut_keys)
    }

    /// Apply the order a drag gesture settled on. `candidate` must be a
    /// permutation of the current working order's keys.
    pub fn drag_release<K>(&mut self, candidate: &[K]) -> DragOutcome
    where
        K: AsRef<str>,
    {
        if !self.is_reordering() {
            return DragOutcome::Rejected(DragRejection::NotReordering);
        }
        let next = match self.resolve_candidate(candidate) {
            Ok(next) => next,
            Err(rejection) => return DragOutcome::Rejected(rejection),
        };

        let retagged = classify(next, self.shortcut_count);
        if retagged == self.working_order {
            return DragOutcome::Unchanged;
        }

        let changes = zone_changes(&self.working_order, &retagged);
        self.working_order = retagged;
        DragOutcome::Applied(changes)
    }

    fn resolve_candidate<K>(&self, candidate: &[K]) -> std::result::Result<Vec<Item>, DragRejection>
    where
        K: AsRef<str>,
    {
        let expected = self.working_order.len();
        if candidate.len() != expected {
            return Err(DragRejection::Cardinality {
                expected,
                actual: candidate.len(),
            });
        }

        let mut lookup: HashMap<&str, &Item> = self
            .working_order
            .iter()
            .map(|entry| (entry.key(), &entry.item))
            .collect();
        let mut next = Vec::with_capacity(expected);
        for key in candidate {
            let key = key.as_ref();
            match lookup.remove(key) {
                Some(item) => next.push(item.clone()),
                None if self.working_order.iter().any(|e| e.key() == key) => {
                    return Err(DragRejection::DuplicateKey(key.to_string()));
                }
                None => return Err(DragRejection::UnknownKey(key.to_string())),
            }
        }
        Ok(next)
    }

    /// Observe the externally owned reset token. Any change resets the
    /// session; returns whether that happened.
    pub fn sync_reset_token(&mut self, token: u64, store: &OrderingStore) -> bool {
        if token == self.reset_token {
            return false;
        }
        self.reset_token = token;
        self.reset(store);
        true
    }

    /// Drop in-flight edits and any open item, then mirror the committed order.
    pub fn reset(&mut self, store: &OrderingStore) {
        self.state = SessionState::Idle;
        self.drilldown = None;
        self.shortcut_count = store.shortcut_count();
        self.working_order = combined_view(store);
    }

    /// Open an overflow item in place of the grid. Only allowed while Idle.
    pub fn select_item(&mut self, key: &str) -> Result<()> {
        if self.is_reordering() {
            return Err(ShellError::NotSelectable(key.to_string()));
        }
        match self.working_order.iter().find(|entry| entry.key() == key) {
            Some(entry) if entry.zone == Zone::Overflow => {
                self.drilldown = Some(entry.item.key.clone());
                Ok(())
            }
            Some(_) => Err(ShellError::NotSelectable(key.to_string())),
            None => Err(ShellError::UnknownItem(key.to_string())),
        }
    }

    pub fn close_drilldown(&mut self) -> Option<ItemKey> {
        self.drilldown.take()
    }
}

/// Candidate order for picking up the item at `from` and dropping it at `to`.
pub fn move_candidate(working: &[ZoneTaggedItem], from: usize, to: usize) -> Option<Vec<ItemKey>> {
    if from >= working.len() || to >= working.len() {
        return None;
    }
    let mut keys: Vec<ItemKey> = working.iter().map(|e| e.item.key.clone()).collect();
    let moved = keys.remove(from);
    keys.insert(to, moved);
    Some(keys)
}

fn combined_view(store: &OrderingStore) -> Vec<ZoneTaggedItem> {
    let combined: Vec<Item> = store
        .overflow_view()
        .iter()
        .chain(store.shortcut_view())
        .cloned()
        .collect();
    classify(combined, store.shortcut_count())
}

fn zone_changes(before: &[ZoneTaggedItem], after: &[ZoneTaggedItem]) -> ZoneChanges {
    let previous: HashMap<&str, Zone> = before.iter().map(|e| (e.key(), e.zone)).collect();
    let mut changes = ZoneChanges::default();
    for entry in after {
        match (previous.get(entry.key()), entry.zone) {
            (Some(Zone::Overflow), Zone::Shortcut) => changes.promoted.push(entry.key().to_string()),
            (Some(Zone::Shortcut), Zone::Overflow) => changes.demoted.push(entry.key().to_string()),
            _ => {}
        }
    }
    changes
}
