//! Blueprint kernel: the pure layout engine.
//!
//! Everything here is synchronous and free of network I/O:
//!
//! - [`ops`]: structural edits that return new trees
//! - [`selection`]: keeping the selected node valid after edits
//! - [`registry`] and [`fill`]: default view configs from live topics
//! - [`draft`]: local overlays of unsaved trees
//!
//! Edits never fail. An id that no longer names a suitable node leaves the
//! tree as it was, so stale UI events are harmless.

pub mod draft;
pub mod fill;
pub mod ops;
pub mod registry;
pub mod selection;

pub use draft::{DraftError, DraftKey, DraftResult, DraftStore, FileDraftStore, MemoryDraftStore};
pub use fill::fill_default_config;
pub use ops::{
    BlueprintEdit, add_tab, delete_node, remove_tab, rename_tab, replace_view, update_split_direction,
    update_split_sizes, update_tabs_active, update_view_config, update_view_type, wrap_in_split,
    wrap_in_tabs,
};
pub use registry::{ConfigGenerator, ViewRegistry};
pub use selection::ensure_valid_selection;
