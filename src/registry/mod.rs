//! Item registry orchestrator.
//!
//! Items are immutable descriptors loaded once; the rest of the crate refers
//! to them by key and clones them into orderings.

pub mod catalog;
mod core;

pub(crate) use self::core::index_keys;
pub use catalog::{CatalogSpec, ItemSpec, builtin_catalog, builtin_renderable};
pub use self::core::{Item, ItemKey, ItemRegistry, Renderable};
