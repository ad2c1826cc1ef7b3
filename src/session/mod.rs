//! Reorder session module orchestrator.

mod core;

pub use self::core::{
    DragOutcome, DragRejection, ReorderSession, SessionState, ToggleOutcome, ZoneChanges,
    move_candidate,
};
