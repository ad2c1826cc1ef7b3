use crate::registry::Item;

/// Which part of the shell an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Overflow,
    Shortcut,
}

impl Zone {
    pub fn label(self) -> &'static str {
        match self {
            Zone::Overflow => "more",
            Zone::Shortcut => "shortcut",
        }
    }
}

/// An item annotated with the zone its current position implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneTaggedItem {
    pub item: Item,
    pub zone: Zone,
}

impl ZoneTaggedItem {
    pub fn key(&self) -> &str {
        &self.item.key
    }
}

/// Index of the first shortcut position in a sequence of `len` items.
pub fn shortcut_boundary(len: usize, shortcut_count: usize) -> usize {
    len.saturating_sub(shortcut_count)
}

/// Tag every item by position alone: the trailing `shortcut_count` items are
/// shortcuts, everything before them is overflow.
pub fn classify(items: Vec<Item>, shortcut_count: usize) -> Vec<ZoneTaggedItem> {
    let boundary = shortcut_boundary(items.len(), shortcut_count);
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| ZoneTaggedItem {
            item,
            zone: if idx < boundary {
                Zone::Overflow
            } else {
                Zone::Shortcut
            },
        })
        .collect()
}

pub fn declassify<I>(tagged: I) -> Vec<Item>
where
    I: IntoIterator<Item = ZoneTaggedItem>,
{
    tagged.into_iter().map(|entry| entry.item).collect()
}

/// Stable partition into `(overflow, shortcuts)` by tag.
pub fn split_by_zone<I>(tagged: I) -> (Vec<Item>, Vec<Item>)
where
    I: IntoIterator<Item = ZoneTaggedItem>,
{
    let mut overflow = Vec::new();
    let mut shortcuts = Vec::new();
    for entry in tagged {
        match entry.zone {
            Zone::Overflow => overflow.push(entry.item),
            Zone::Shortcut => shortcuts.push(entry.item),
        }
    }
    (overflow, shortcuts)
}
