//! Zone classification module orchestrator.
//!
//! Zone membership is always recomputed from position; nothing here remembers
//! where an item used to be.

mod core;

pub use self::core::{
    Zone, ZoneTaggedItem, classify, declassify, shortcut_boundary, split_by_zone,
};
