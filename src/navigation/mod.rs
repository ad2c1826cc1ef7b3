//! Navigation strip module orchestrator.

mod core;

pub use self::core::{
    MORE_ENTRY_ACCENT, MORE_ENTRY_KEY, MORE_ENTRY_LABEL, NavEntry, NavSelection,
    NavigationPresenter, SelectionFallback,
};
