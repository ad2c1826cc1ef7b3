use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, ShellError};

pub type ItemKey = String;

/// Opaque handle producing an item's screen content. The ordering engine
/// never calls it; only renderers do.
#[derive(Clone)]
pub struct Renderable(Arc<dyn Fn() -> String + Send + Sync>);

impl Renderable {
    pub fn new<F>(render: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self(Arc::new(render))
    }

    /// Title-only screen.
    pub fn screen(title: impl Into<String>) -> Self {
        let title = title.into();
        Self::new(move || title.clone())
    }

    /// Tool screen that has not shipped yet.
    pub fn coming_soon(title: impl Into<String>) -> Self {
        let title = title.into();
        Self::new(move || format!("{title}\nThis feature is coming soon."))
    }

    pub fn render(&self) -> String {
        (self.0)()
    }
}

impl fmt::Debug for Renderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Renderable(..)")
    }
}

/// Immutable navigable item.
#[derive(Debug, Clone)]
pub struct Item {
    pub key: ItemKey,
    pub label: String,
    pub renderable: Renderable,
    pub accent: Option<String>,
}

impl Item {
    pub fn new(key: impl Into<ItemKey>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            key: key.into(),
            renderable: Renderable::screen(label.clone()),
            label,
            accent: None,
        }
    }

    pub fn with_accent(mut self, accent: impl Into<String>) -> Self {
        self.accent = Some(accent.into());
        self
    }

    pub fn with_renderable(mut self, renderable: Renderable) -> Self {
        self.renderable = renderable;
        self
    }
}

// Renderables are closures and cannot be compared; identity is the key plus
// its display attributes.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.label == other.label && self.accent == other.accent
    }
}

impl Eq for Item {}

/// Closed catalog of every item the shell can show, in catalog order:
/// default shortcuts first, then the default "More" items.
#[derive(Debug, Clone)]
pub struct ItemRegistry {
    items: Vec<Item>,
    index: HashMap<ItemKey, usize>,
    default_shortcut_count: usize,
}

impl ItemRegistry {
    pub fn from_parts(shortcuts: Vec<Item>, more: Vec<Item>) -> Result<Self> {
        let default_shortcut_count = shortcuts.len();
        let items: Vec<Item> = shortcuts.into_iter().chain(more).collect();
        let index = index_keys(&items)?;
        Ok(Self {
            items,
            index,
            default_shortcut_count,
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Item> {
        self.index.get(key).map(|&idx| &self.items[idx])
    }

    pub fn resolve(&self, key: &str) -> Result<&Item> {
        self.get(key)
            .ok_or_else(|| ShellError::UnknownItem(key.to_string()))
    }

    /// Number of shortcut slots the catalog was authored with.
    pub fn default_shortcut_count(&self) -> usize {
        self.default_shortcut_count
    }

    pub fn default_shortcuts(&self) -> &[Item] {
        &self.items[..self.default_shortcut_count]
    }

    pub fn default_overflow(&self) -> &[Item] {
        &self.items[self.default_shortcut_count..]
    }

    /// Master order as the ordering store expects it: overflow first, then
    /// the shortcut items.
    pub fn initial_order(&self) -> Vec<Item> {
        self.default_overflow()
            .iter()
            .chain(self.default_shortcuts())
            .cloned()
            .collect()
    }
}

/// Builds a key → position index, rejecting empty and repeated keys.
pub(crate) fn index_keys(items: &[Item]) -> Result<HashMap<ItemKey, usize>> {
    let mut index = HashMap::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        if item.key.is_empty() {
            return Err(ShellError::EmptyKey);
        }
        if index.insert(item.key.clone(), idx).is_some() {
            return Err(ShellError::DuplicateKey(item.key.clone()));
        }
    }
    Ok(index)
}
