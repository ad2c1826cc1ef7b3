//! Frame renderer module orchestrator.

mod core;

pub use self::core::{AnsiRenderer, RendererSettings, render_lines};
