use std::collections::HashMap;

use blake3::Hash;

use crate::error::{Result, ShellError};
use crate::registry::{Item, ItemKey, ItemRegistry, index_keys};
use crate::zone::shortcut_boundary;

/// Receiver of a finished reorder session. Whoever owns the canonical master
/// order implements this.
pub trait ApplyReorder {
    fn apply_reorder(&mut self, next_shortcuts: Vec<Item>, next_overflow: Vec<Item>)
    -> Result<()>;
}

/// Owner of the master order. The shortcut bar is the trailing
/// `shortcut_count` items, the overflow collection everything before it.
#[derive(Debug, Clone)]
pub struct OrderingStore {
    master: Vec<Item>,
    index: HashMap<ItemKey, usize>,
    shortcut_count: usize,
    revision: u64,
}

impl OrderingStore {
    /// `master` must already be in `overflow ++ shortcuts` order.
    pub fn new(master: Vec<Item>, shortcut_count: usize) -> Result<Self> {
        let index = index_keys(&master)?;
        Ok(Self {
            master,
            index,
            shortcut_count,
            revision: 0,
        })
    }

    pub fn from_registry(registry: &ItemRegistry, shortcut_count: usize) -> Result<Self> {
        Self::new(registry.initial_order(), shortcut_count)
    }

    pub fn master_order(&self) -> &[Item] {
        &self.master
    }

    pub fn len(&self) -> usize {
        self.master.len()
    }

    pub fn is_empty(&self) -> bool {
        self.master.is_empty()
    }

    pub fn shortcut_count(&self) -> usize {
        self.shortcut_count
    }

    pub fn boundary(&self) -> usize {
        shortcut_boundary(self.master.len(), self.shortcut_count)
    }

    pub fn shortcut_view(&self) -> &[Item] {
        &self.master[self.boundary()..]
    }

    pub fn overflow_view(&self) -> &[Item] {
        &self.master[..self.boundary()]
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Number of successful commits since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn fingerprint(&self) -> Hash {
        hash_keys(&self.master)
    }

    pub fn shortcut_fingerprint(&self) -> Hash {
        hash_keys(self.shortcut_view())
    }

    /// Replace the master order with `next_overflow ++ next_shortcuts`.
    ///
    /// Both halves together must hold every current key exactly once. A
    /// mismatch is a caller bug: it is reported and the order is left as is.
    /// Incoming items are matched by key; the stored descriptors are kept.
    pub fn commit(&mut self, next_shortcuts: Vec<Item>, next_overflow: Vec<Item>) -> Result<()> {
        let incoming = next_shortcuts.len() + next_overflow.len();
        if incoming != self.master.len() {
            return Err(ShellError::CommitMismatch(format!(
                "expected {} items, got {}",
                self.master.len(),
                incoming
            )));
        }

        let mut seen = vec![false; self.master.len()];
        let mut next = Vec::with_capacity(self.master.len());
        let mut next_index = HashMap::with_capacity(self.master.len());
        for (pos, item) in next_overflow.iter().chain(&next_shortcuts).enumerate() {
            let slot = self.index.get(&item.key).copied().ok_or_else(|| {
                ShellError::CommitMismatch(format!("unknown item `{}`", item.key))
            })?;
            if seen[slot] {
                return Err(ShellError::CommitMismatch(format!(
                    "item `{}` appears twice",
                    item.key
                )));
            }
            seen[slot] = true;
            next.push(self.master[slot].clone());
            next_index.insert(item.key.clone(), pos);
        }

        self.master = next;
        self.index = next_index;
        self.revision += 1;
        Ok(())
    }
}

impl ApplyReorder for OrderingStore {
    fn apply_reorder(
        &mut self,
        next_shortcuts: Vec<Item>,
        next_overflow: Vec<Item>,
    ) -> Result<()> {
        self.commit(next_shortcuts, next_overflow)
    }
}

fn hash_keys(items: &[Item]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    for item in items {
        hasher.update(item.key.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}
