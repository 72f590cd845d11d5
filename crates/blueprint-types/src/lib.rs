//! Layout tree, identity, and wire types for the blueprint layout engine.
//!
//! This crate is the data foundation: typed ids, the recursive
//! [`BlueprintNode`] tree and its well-formedness rules, session references,
//! and the request/response bodies of the backend blueprint catalogue. It has
//! **no internal dependencies**: a pure leaf crate that the kernel, client,
//! and console crates build on.
//!
//! # Relationship Overview
//!
//! ```text
//! Session (SessionKind + SessionId) ← live recording / teleop / inference
//!     └── bound to one Blueprint by the backend
//!
//! Blueprint (BlueprintId + name) ← durable, named layout
//!     └── owns one tree of BlueprintNode
//!
//! BlueprintNode (NodeId)
//!     ├── View  (leaf, viewType + config)
//!     ├── Split (two children + sizes)
//!     └── Tabs  (≥ 1 Tab (TabId) + activeId)
//! ```
//!
//! # Key Types
//!
//! |-----------------------|---------------------------------------------|
//! | Type                  | Purpose                                     |
//! |-----------------------|---------------------------------------------|
//! | [`BlueprintNode`]     | Recursive layout tree                       |
//! | [`LayoutLimits`]      | Split-size bounds checked by [`validate`]   |
//! | [`BlueprintDetail`]   | Named blueprint with tree (wire + domain)   |
//! | [`BlueprintSummary`]  | Catalogue listing entry                     |
//! | [`SessionRef`]        | Live session (kind + id)                    |
//! | [`NodeId`], [`TabId`] | Tree-local ids, unique within one tree      |
//! |-----------------------|---------------------------------------------|

pub mod blueprint;
pub mod ids;
pub mod invariants;
pub mod node;
pub mod session;

// Re-export primary types at crate root for convenience.
pub use blueprint::{
    BlueprintDetail, BlueprintSummary, CreateBlueprint, ResolveSessionRequest,
    SessionBindingRequest, UpdateBlueprint,
};
pub use ids::{BlueprintId, NodeId, SessionId, TabId};
pub use invariants::{
    DEFAULT_MIN_SPLIT_SIZE, InvariantError, LayoutLimits, SIZE_TOLERANCE, invariant_report,
    validate,
};
pub use node::{
    BlueprintNode, PLACEHOLDER_VIEW_TYPE, SplitDirection, SplitNode, Tab, TabsNode, ViewConfig,
    ViewNode, create_default_blueprint, find_node,
};
pub use session::{SessionKind, SessionRef};
