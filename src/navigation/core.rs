use blake3::Hash;

use crate::error::{Result, ShellError};
use crate::ordering::OrderingStore;
use crate::registry::ItemKey;

pub const MORE_ENTRY_KEY: &str = "nav-more";
pub const MORE_ENTRY_LABEL: &str = "More";
pub const MORE_ENTRY_ACCENT: &str = "#FF7A3C";

/// One slot of the navigation strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub key: ItemKey,
    pub label: String,
    pub accent: Option<String>,
}

impl NavEntry {
    pub fn more() -> Self {
        Self {
            key: MORE_ENTRY_KEY.to_string(),
            label: MORE_ENTRY_LABEL.to_string(),
            accent: Some(MORE_ENTRY_ACCENT.to_string()),
        }
    }

    pub fn is_more(&self) -> bool {
        self.key == MORE_ENTRY_KEY
    }
}

/// Reported when the active entry vanished from the strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionFallback {
    pub previous: ItemKey,
    pub current: ItemKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSelection {
    pub key: ItemKey,
    /// Set when the selection bumped the reset token.
    pub reset_token: Option<u64>,
}

/// Navigation strip: the shortcut view followed by the fixed More entry.
#[derive(Debug, Clone)]
pub struct NavigationPresenter {
    strip: Vec<NavEntry>,
    active: ItemKey,
    reset_token: u64,
    shortcuts_hash: Hash,
}

impl NavigationPresenter {
    pub fn new(store: &OrderingStore) -> Self {
        let strip = build_strip(store);
        let active = strip
            .first()
            .map(|entry| entry.key.clone())
            .unwrap_or_else(|| MORE_ENTRY_KEY.to_string());
        Self {
            strip,
            active,
            reset_token: 0,
            shortcuts_hash: store.shortcut_fingerprint(),
        }
    }

    pub fn strip(&self) -> &[NavEntry] {
        &self.strip
    }

    pub fn active_selection(&self) -> &str {
        &self.active
    }

    pub fn active_entry(&self) -> &NavEntry {
        self.strip
            .iter()
            .find(|entry| entry.key == self.active)
            .unwrap_or(&self.strip[0])
    }

    pub fn is_more_active(&self) -> bool {
        self.active == MORE_ENTRY_KEY
    }

    pub fn reset_token(&self) -> u64 {
        self.reset_token
    }

    /// Rebuild the strip if the shortcut view changed, keeping the active
    /// selection valid.
    pub fn sync(&mut self, store: &OrderingStore) -> Option<SelectionFallback> {
        let hash = store.shortcut_fingerprint();
        if hash == self.shortcuts_hash {
            return None;
        }
        self.shortcuts_hash = hash;
        self.strip = build_strip(store);

        if self.strip.iter().any(|entry| entry.key == self.active) {
            return None;
        }
        let current = self.strip[0].key.clone();
        let previous = std::mem::replace(&mut self.active, current.clone());
        Some(SelectionFallback { previous, current })
    }

    /// Activate a strip entry. Choosing More bumps the reset token so the
    /// overflow screen reopens from the committed order.
    pub fn select(&mut self, key: &str) -> Result<NavSelection> {
        if !self.strip.iter().any(|entry| entry.key == key) {
            return Err(ShellError::UnknownNavEntry(key.to_string()));
        }
        let reset_token = if key == MORE_ENTRY_KEY {
            self.reset_token = self.reset_token.wrapping_add(1);
            Some(self.reset_token)
        } else {
            None
        };
        self.active = key.to_string();
        Ok(NavSelection {
            key: self.active.clone(),
            reset_token,
        })
    }
}

fn build_strip(store: &OrderingStore) -> Vec<NavEntry> {
    store
        .shortcut_view()
        .iter()
        .map(|item| NavEntry {
            key: item.key.clone(),
            label: item.label.clone(),
            accent: item.accent.clone(),
        })
        .chain(std::iter::once(NavEntry::more()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Item;

    fn items(keys: &[&str]) -> Vec<Item> {
        keys.iter().map(|k| Item::new(*k, k.to_uppercase())).collect()
    }

    fn store() -> OrderingStore {
        OrderingStore::new(items(&["d", "e", "a", "b"]), 2).unwrap()
    }

    fn strip_keys(presenter: &NavigationPresenter) -> Vec<&str> {
        presenter.strip().iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn strip_is_shortcuts_then_more() {
        let presenter = NavigationPresenter::new(&store());
        assert_eq!(strip_keys(&presenter), vec!["a", "b", MORE_ENTRY_KEY]);
        assert_eq!(presenter.active_selection(), "a");
        assert!(presenter.strip()[2].is_more());
    }

    #[test]
    fn empty_store_starts_on_more() {
        let store = OrderingStore::new(Vec::new(), 3).unwrap();
        let presenter = NavigationPresenter::new(&store);
        assert!(presenter.is_more_active());
        assert_eq!(presenter.active_entry().label, MORE_ENTRY_LABEL);
    }

    #[test]
    fn selecting_more_bumps_reset_token_each_time() {
        let mut presenter = NavigationPresenter::new(&store());
        let first = presenter.select(MORE_ENTRY_KEY).unwrap();
        let second = presenter.select(MORE_ENTRY_KEY).unwrap();
        assert_eq!(first.reset_token, Some(1));
        assert_eq!(second.reset_token, Some(2));
        assert!(presenter.is_more_active());

        let plain = presenter.select("b").unwrap();
        assert_eq!(plain.reset_token, None);
        assert_eq!(presenter.reset_token(), 2);
    }

    #[test]
    fn unknown_entry_is_rejected() {
        let mut presenter = NavigationPresenter::new(&store());
        assert!(matches!(
            presenter.select("d"),
            Err(ShellError::UnknownNavEntry(key)) if key == "d"
        ));
        assert_eq!(presenter.active_selection(), "a");
    }

    #[test]
    fn active_item_reordered_out_falls_back_to_first() {
        let mut store = store();
        let mut presenter = NavigationPresenter::new(&store);
        presenter.select("b").unwrap();

        store.commit(items(&["a", "d"]), items(&["e", "b"])).unwrap();
        let fallback = presenter.sync(&store).unwrap();
        assert_eq!(fallback.previous, "b");
        assert_eq!(fallback.current, "a");
        assert_eq!(strip_keys(&presenter), vec!["a", "d", MORE_ENTRY_KEY]);
        assert_eq!(presenter.active_selection(), "a");
    }

    #[test]
    fn more_survives_any_reorder() {
        let mut store = store();
        let mut presenter = NavigationPresenter::new(&store);
        presenter.select(MORE_ENTRY_KEY).unwrap();

        store.commit(items(&["d", "e"]), items(&["a", "b"])).unwrap();
        assert!(presenter.sync(&store).is_none());
        assert!(presenter.is_more_active());
        assert_eq!(strip_keys(&presenter), vec!["d", "e", MORE_ENTRY_KEY]);
    }

    #[test]
    fn unchanged_bar_skips_rebuild() {
        let mut store = store();
        let mut presenter = NavigationPresenter::new(&store);
        store.commit(items(&["a", "b"]), items(&["e", "d"])).unwrap();
        assert!(presenter.sync(&store).is_none());
        assert_eq!(strip_keys(&presenter), vec!["a", "b", MORE_ENTRY_KEY]);
    }
}
