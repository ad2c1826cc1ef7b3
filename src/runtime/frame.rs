use crate::registry::ItemKey;
use crate::zone::Zone;

/// Everything a renderer needs for one pass, detached from runtime state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellFrame {
    pub nav: Vec<NavCell>,
    pub screen: ScreenFrame,
    pub overlay: GridOverlay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavCell {
    pub key: ItemKey,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenFrame {
    /// A shortcut item's own screen.
    Item { key: ItemKey, content: String },
    /// The More grid. Tiles carry a zone only while reordering.
    More {
        reordering: bool,
        tiles: Vec<GridTile>,
    },
    /// An overflow item opened from the More grid.
    Drilldown { key: ItemKey, content: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTile {
    pub key: ItemKey,
    pub label: String,
    pub zone: Option<Zone>,
}

/// Driver-side decorations for the More grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridOverlay {
    pub cursor: Option<usize>,
    pub held: Option<usize>,
}

impl ShellFrame {
    pub fn active_nav(&self) -> Option<&NavCell> {
        self.nav.iter().find(|cell| cell.active)
    }

    pub fn tiles(&self) -> &[GridTile] {
        match &self.screen {
            ScreenFrame::More { tiles, .. } => tiles,
            _ => &[],
        }
    }
}
