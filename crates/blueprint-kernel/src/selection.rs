//! Keeping the selected node pointed at something that exists.

use blueprint_types::{BlueprintNode, NodeId};

/// Return `selected` if it names a node in `tree`, otherwise the root's id.
///
/// Called after every edit that can remove nodes.
pub fn ensure_valid_selection(tree: &BlueprintNode, selected: Option<&NodeId>) -> NodeId {
    match selected {
        Some(id) if tree.contains(id) => id.clone(),
        Some(id) => {
            tracing::debug!(stale = %id, root = %tree.id(), "selection fell back to root");
            tree.id().clone()
        }
        None => tree.id().clone(),
    }
}
