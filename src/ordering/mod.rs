//! Ordering store module orchestrator.

mod core;

pub use self::core::{ApplyReorder, OrderingStore};
