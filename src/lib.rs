//! Shortcut bar and "More" overflow ordering engine.
//!
//! One master order backs both surfaces: the trailing `N` items form the
//! shortcut bar and everything before them is listed on the More screen. A
//! reorder session edits a zone-tagged working copy and commits it back in a
//! single step. The modules follow the RSB `MODULE_SPEC` pattern: each
//! `mod.rs` is an orchestrator re-exporting its private `core.rs`.

pub mod cursor;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod navigation;
pub mod ordering;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod session;
pub mod width;
pub mod zone;

pub use error::{Result, ShellError};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{MetricSnapshot, ShellMetrics};
pub use navigation::{MORE_ENTRY_KEY, NavEntry, NavSelection, NavigationPresenter, SelectionFallback};
pub use ordering::{ApplyReorder, OrderingStore};
pub use registry::{CatalogSpec, Item, ItemKey, ItemRegistry, ItemSpec, Renderable};
pub use render::{AnsiRenderer, RendererSettings};
pub use runtime::audit::{
    BufferedShellAudit, NullShellAudit, ShellAudit, ShellAuditEvent, ShellAuditEventBuilder,
    ShellAuditStage,
};
pub use runtime::driver::cli::{CliDriver, CliDriverError, DriverResult, KeyAction, KeyMapper};
pub use runtime::frame::{GridOverlay, GridTile, NavCell, ScreenFrame, ShellFrame};
pub use runtime::{EventFlow, ShellConfig, ShellEvent, ShellRuntime};
pub use session::{
    DragOutcome, DragRejection, ReorderSession, SessionState, ToggleOutcome, ZoneChanges,
    move_candidate,
};
pub use width::display_width;
pub use zone::{Zone, ZoneTaggedItem, classify, declassify, shortcut_boundary, split_by_zone};
