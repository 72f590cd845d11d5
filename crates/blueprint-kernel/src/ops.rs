//! Structural edit algebra for layout trees.
//!
//! Every function takes the current root by reference and returns a new
//! root; inputs are never mutated. The path from the root to the edited node
//! is rebuilt and untouched siblings are cloned as-is.
//!
//! Two guarantees hold for every function here:
//!
//! 1. A well-formed input yields a well-formed output (see
//!    [`blueprint_types::invariants`]).
//! 2. An id that does not name a suitable node yields a tree equal to the
//!    input. Stale ids from the UI are expected and never an error.
//!
//! ## Policies
//!
//! - `remove_tab` on the active tab activates its predecessor, or the new
//!   first tab when the removed tab was first.
//! - Removing the last tab collapses the Tabs node into that tab's child.
//! - `delete_node` under a Split promotes the sibling; under a Tabs with one
//!   tab, or at the root, it leaves a fresh placeholder view behind.

use blueprint_types::{
    BlueprintNode, LayoutLimits, NodeId, SplitDirection, SplitNode, Tab, TabId, TabsNode,
    ViewConfig, create_default_blueprint,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Path rebuilding
// ============================================================================

/// Rebuild `tree` with the node named `id` replaced by `f(node)`.
///
/// Returns `None` when no node has that id.
fn replace_node(
    tree: &BlueprintNode,
    id: &NodeId,
    f: &mut dyn FnMut(&BlueprintNode) -> BlueprintNode,
) -> Option<BlueprintNode> {
    if tree.id() == id {
        return Some(f(tree));
    }
    match tree {
        BlueprintNode::View(_) => None,
        BlueprintNode::Split(split) => {
            for (index, child) in split.children.iter().enumerate() {
                if let Some(next) = replace_node(child, id, f) {
                    let mut rebuilt = split.clone();
                    rebuilt.children[index] = next;
                    return Some(BlueprintNode::Split(rebuilt));
                }
            }
            None
        }
        BlueprintNode::Tabs(tabs) => {
            for (index, tab) in tabs.tabs.iter().enumerate() {
                if let Some(next) = replace_node(&tab.child, id, f) {
                    let mut rebuilt = tabs.clone();
                    rebuilt.tabs[index].child = next;
                    return Some(BlueprintNode::Tabs(rebuilt));
                }
            }
            None
        }
    }
}

/// Apply `f` to the node named `id`, or return the tree unchanged.
fn rebuild(
    tree: &BlueprintNode,
    id: &NodeId,
    op: &'static str,
    mut f: impl FnMut(&BlueprintNode) -> BlueprintNode,
) -> BlueprintNode {
    match replace_node(tree, id, &mut f) {
        Some(next) => next,
        None => {
            tracing::trace!(node = %id, op, "no such node, edit skipped");
            tree.clone()
        }
    }
}

fn edit_split(
    tree: &BlueprintNode,
    id: &NodeId,
    op: &'static str,
    mut f: impl FnMut(&mut SplitNode),
) -> BlueprintNode {
    rebuild(tree, id, op, |node| match node {
        BlueprintNode::Split(split) => {
            let mut next = split.clone();
            f(&mut next);
            BlueprintNode::Split(next)
        }
        other => other.clone(),
    })
}

fn edit_view(
    tree: &BlueprintNode,
    id: &NodeId,
    op: &'static str,
    mut f: impl FnMut(&mut blueprint_types::ViewNode),
) -> BlueprintNode {
    rebuild(tree, id, op, |node| match node {
        BlueprintNode::View(view) => {
            let mut next = view.clone();
            f(&mut next);
            BlueprintNode::View(next)
        }
        other => other.clone(),
    })
}

/// Tabs edits may collapse the node, so the closure yields a whole node.
fn edit_tabs(
    tree: &BlueprintNode,
    id: &NodeId,
    op: &'static str,
    mut f: impl FnMut(&TabsNode) -> BlueprintNode,
) -> BlueprintNode {
    rebuild(tree, id, op, |node| match node {
        BlueprintNode::Tabs(tabs) => f(tabs),
        other => other.clone(),
    })
}

// ============================================================================
// Split edits
// ============================================================================

/// Resize a split. The first weight is clamped to `[min, 1 - min]` and the
/// second derived from it; the caller's second weight is ignored.
pub fn update_split_sizes(
    tree: &BlueprintNode,
    split_id: &NodeId,
    sizes: [f64; 2],
    limits: &LayoutLimits,
) -> BlueprintNode {
    let Some(clamped) = limits.clamp_sizes(sizes[0]) else {
        tracing::trace!(node = %split_id, ?sizes, "non-finite split size ignored");
        return tree.clone();
    };
    edit_split(tree, split_id, "update_split_sizes", |split| {
        split.sizes = clamped;
    })
}

/// Change a split's axis.
pub fn update_split_direction(
    tree: &BlueprintNode,
    split_id: &NodeId,
    direction: SplitDirection,
) -> BlueprintNode {
    edit_split(tree, split_id, "update_split_direction", |split| {
        split.direction = direction;
    })
}

/// Replace the target with an even split of (target, fresh placeholder).
pub fn wrap_in_split(
    tree: &BlueprintNode,
    target_id: &NodeId,
    direction: SplitDirection,
) -> BlueprintNode {
    rebuild(tree, target_id, "wrap_in_split", |node| {
        SplitNode::new(direction, node.clone(), create_default_blueprint()).into()
    })
}

// ============================================================================
// Tabs edits
// ============================================================================

/// Replace the target with a one-tab group (`"Tab 1"`) holding it.
pub fn wrap_in_tabs(tree: &BlueprintNode, target_id: &NodeId) -> BlueprintNode {
    rebuild(tree, target_id, "wrap_in_tabs", |node| {
        TabsNode::single("Tab 1", node.clone()).into()
    })
}

/// Activate a tab, if it exists.
pub fn update_tabs_active(tree: &BlueprintNode, tabs_id: &NodeId, active_id: &TabId) -> BlueprintNode {
    edit_tabs(tree, tabs_id, "update_tabs_active", |tabs| {
        let mut next = tabs.clone();
        if next.position(active_id).is_some() {
            next.active_id = active_id.clone();
        }
        next.into()
    })
}

/// Append `"Tab N"` (N = count + 1) holding a fresh placeholder. The active
/// tab is unchanged.
pub fn add_tab(tree: &BlueprintNode, tabs_id: &NodeId) -> BlueprintNode {
    edit_tabs(tree, tabs_id, "add_tab", |tabs| {
        let mut next = tabs.clone();
        let title = format!("Tab {}", next.tabs.len() + 1);
        next.tabs.push(Tab::new(title, create_default_blueprint()));
        next.into()
    })
}

/// Set a tab's title.
pub fn rename_tab(
    tree: &BlueprintNode,
    tabs_id: &NodeId,
    tab_id: &TabId,
    title: &str,
) -> BlueprintNode {
    edit_tabs(tree, tabs_id, "rename_tab", |tabs| {
        let mut next = tabs.clone();
        if let Some(tab) = next.tabs.iter_mut().find(|t| &t.id == tab_id) {
            tab.title = title.to_string();
        }
        next.into()
    })
}

/// Remove a tab.
///
/// If it was active, its predecessor becomes active (or the new first tab).
/// Removing the only tab replaces the whole Tabs node with that tab's child.
pub fn remove_tab(tree: &BlueprintNode, tabs_id: &NodeId, tab_id: &TabId) -> BlueprintNode {
    edit_tabs(tree, tabs_id, "remove_tab", |tabs| {
        let Some(index) = tabs.position(tab_id) else {
            return tabs.clone().into();
        };
        if tabs.tabs.len() == 1 {
            return tabs.tabs[0].child.clone();
        }

        let mut next = tabs.clone();
        next.tabs.remove(index);
        if &tabs.active_id == tab_id {
            let successor = index.saturating_sub(1);
            next.active_id = next.tabs[successor].id.clone();
        }
        next.into()
    })
}

// ============================================================================
// View edits
// ============================================================================

/// Change a view's type. Config is left alone; callers follow up with
/// [`update_view_config`] (or use [`replace_view`]).
pub fn update_view_type(tree: &BlueprintNode, view_id: &NodeId, next_type: &str) -> BlueprintNode {
    edit_view(tree, view_id, "update_view_type", |view| {
        view.view_type = next_type.to_string();
    })
}

/// Replace a view's config wholesale.
pub fn update_view_config(
    tree: &BlueprintNode,
    view_id: &NodeId,
    next_config: ViewConfig,
) -> BlueprintNode {
    edit_view(tree, view_id, "update_view_config", |view| {
        view.config = next_config.clone();
    })
}

/// Retype and reconfigure a view in one step.
pub fn replace_view(
    tree: &BlueprintNode,
    view_id: &NodeId,
    next_type: &str,
    next_config: ViewConfig,
) -> BlueprintNode {
    edit_view(tree, view_id, "replace_view", |view| {
        view.view_type = next_type.to_string();
        view.config = next_config.clone();
    })
}

// ============================================================================
// Deletion
// ============================================================================

/// Where a node hangs in the tree.
enum Parent<'a> {
    Root,
    Split { split: &'a SplitNode, index: usize },
    Tabs { tabs: &'a TabsNode, tab: &'a Tab },
}

fn locate<'a>(tree: &'a BlueprintNode, id: &NodeId) -> Option<Parent<'a>> {
    if tree.id() == id {
        return Some(Parent::Root);
    }
    locate_below(tree, id)
}

fn locate_below<'a>(node: &'a BlueprintNode, id: &NodeId) -> Option<Parent<'a>> {
    match node {
        BlueprintNode::View(_) => None,
        BlueprintNode::Split(split) => split.children.iter().enumerate().find_map(|(index, child)| {
            if child.id() == id {
                Some(Parent::Split { split, index })
            } else {
                locate_below(child, id)
            }
        }),
        BlueprintNode::Tabs(tabs) => tabs.tabs.iter().find_map(|tab| {
            if tab.child.id() == id {
                Some(Parent::Tabs { tabs, tab })
            } else {
                locate_below(&tab.child, id)
            }
        }),
    }
}

/// Delete a node; the tree is never left empty.
///
/// - under a Split: the sibling takes the Split's place;
/// - under a Tabs with several tabs: same as [`remove_tab`];
/// - under a Tabs with one tab, or at the root: a fresh placeholder view
///   takes the node's place.
pub fn delete_node(tree: &BlueprintNode, node_id: &NodeId) -> BlueprintNode {
    match locate(tree, node_id) {
        None => {
            tracing::trace!(node = %node_id, "no such node, delete skipped");
            tree.clone()
        }
        Some(Parent::Root) => create_default_blueprint(),
        Some(Parent::Split { split, index }) => {
            let sibling = split.children[1 - index].clone();
            rebuild(tree, &split.id, "delete_node", |_| sibling.clone())
        }
        Some(Parent::Tabs { tabs, tab }) if tabs.tabs.len() > 1 => remove_tab(tree, &tabs.id, &tab.id),
        Some(Parent::Tabs { .. }) => {
            rebuild(tree, node_id, "delete_node", |_| create_default_blueprint())
        }
    }
}

// ============================================================================
// Serializable edits
// ============================================================================

/// A structural edit as data, for logging, replay and drafts of intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BlueprintEdit {
    UpdateSplitSizes { split: NodeId, sizes: [f64; 2] },
    UpdateSplitDirection { split: NodeId, direction: SplitDirection },
    UpdateTabsActive { tabs: NodeId, active: TabId },
    WrapInSplit { target: NodeId, direction: SplitDirection },
    WrapInTabs { target: NodeId },
    UpdateViewType { view: NodeId, view_type: String },
    UpdateViewConfig { view: NodeId, config: ViewConfig },
    AddTab { tabs: NodeId },
    RenameTab { tabs: NodeId, tab: TabId, title: String },
    RemoveTab { tabs: NodeId, tab: TabId },
    DeleteNode { node: NodeId },
}

impl BlueprintEdit {
    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateSplitSizes { .. } => "update_split_sizes",
            Self::UpdateSplitDirection { .. } => "update_split_direction",
            Self::UpdateTabsActive { .. } => "update_tabs_active",
            Self::WrapInSplit { .. } => "wrap_in_split",
            Self::WrapInTabs { .. } => "wrap_in_tabs",
            Self::UpdateViewType { .. } => "update_view_type",
            Self::UpdateViewConfig { .. } => "update_view_config",
            Self::AddTab { .. } => "add_tab",
            Self::RenameTab { .. } => "rename_tab",
            Self::RemoveTab { .. } => "remove_tab",
            Self::DeleteNode { .. } => "delete_node",
        }
    }

    /// Whether this edit can remove nodes (selection must be re-checked).
    pub fn can_remove_nodes(&self) -> bool {
        matches!(self, Self::RemoveTab { .. } | Self::DeleteNode { .. })
    }

    /// Apply to a tree, producing a new tree.
    pub fn apply(&self, tree: &BlueprintNode, limits: &LayoutLimits) -> BlueprintNode {
        match self {
            Self::UpdateSplitSizes { split, sizes } => update_split_sizes(tree, split, *sizes, limits),
            Self::UpdateSplitDirection { split, direction } => {
                update_split_direction(tree, split, *direction)
            }
            Self::UpdateTabsActive { tabs, active } => update_tabs_active(tree, tabs, active),
            Self::WrapInSplit { target, direction } => wrap_in_split(tree, target, *direction),
            Self::WrapInTabs { target } => wrap_in_tabs(tree, target),
            Self::UpdateViewType { view, view_type } => update_view_type(tree, view, view_type),
            Self::UpdateViewConfig { view, config } => update_view_config(tree, view, config.clone()),
            Self::AddTab { tabs } => add_tab(tree, tabs),
            Self::RenameTab { tabs, tab, title } => rename_tab(tree, tabs, tab, title),
            Self::RemoveTab { tabs, tab } => remove_tab(tree, tabs, tab),
            Self::DeleteNode { node } => delete_node(tree, node),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_types::{PLACEHOLDER_VIEW_TYPE, ViewNode, validate};

    fn view(id: &str, view_type: &str) -> BlueprintNode {
        BlueprintNode::View(ViewNode {
            id: NodeId::from(id),
            view_type: view_type.to_string(),
            config: ViewConfig::new(),
        })
    }

    fn tab(id: &str, child: BlueprintNode) -> Tab {
        Tab {
            id: TabId::from(id),
            title: format!("title {id}"),
            child,
        }
    }

    fn tabs(id: &str, active: &str, tabs: Vec<Tab>) -> BlueprintNode {
        BlueprintNode::Tabs(TabsNode {
            id: NodeId::from(id),
            active_id: TabId::from(active),
            tabs,
        })
    }

    fn split(id: &str, a: BlueprintNode, b: BlueprintNode) -> BlueprintNode {
        BlueprintNode::Split(SplitNode {
            id: NodeId::from(id),
            direction: SplitDirection::Row,
            sizes: [0.5, 0.5],
            children: Box::new([a, b]),
        })
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn assert_valid(tree: &BlueprintNode) {
        validate(tree, &LayoutLimits::default()).expect("tree should be well-formed");
    }

    #[test]
    fn test_wrap_default_in_split() {
        let root = create_default_blueprint();
        let root_id = root.id().clone();
        let tree = wrap_in_split(&root, &root_id, SplitDirection::Row);

        let split = tree.as_split().expect("root is now a split");
        assert_eq!(split.sizes, [0.5, 0.5]);
        assert_eq!(split.direction, SplitDirection::Row);
        assert_eq!(split.children[0], root);
        let fresh = split.children[1].as_view().unwrap();
        assert_eq!(fresh.view_type, PLACEHOLDER_VIEW_TYPE);
        assert_ne!(&fresh.id, &root_id);
        assert_valid(&tree);
    }

    #[test]
    fn test_wrap_nested_target() {
        let tree = split("s", view("a", "camera"), view("b", "plot"));
        let next = wrap_in_tabs(&tree, &id("b"));
        let group = next.as_split().unwrap().children[1].as_tabs().unwrap();
        assert_eq!(group.tabs.len(), 1);
        assert_eq!(group.tabs[0].title, "Tab 1");
        assert_eq!(group.active_id, group.tabs[0].id);
        assert_eq!(group.tabs[0].child, view("b", "plot"));
        // Untouched sibling is carried over.
        assert_eq!(next.as_split().unwrap().children[0], view("a", "camera"));
        assert_valid(&next);
    }

    #[test]
    fn test_remove_active_first_tab_activates_next() {
        let tree = tabs("t", "A", vec![tab("A", view("va", "x")), tab("B", view("vb", "y"))]);
        let next = remove_tab(&tree, &id("t"), &TabId::from("A"));
        let group = next.as_tabs().unwrap();
        assert_eq!(group.tabs.len(), 1);
        assert_eq!(group.tabs[0].id, TabId::from("B"));
        assert_eq!(group.active_id, TabId::from("B"));
    }

    #[test]
    fn test_remove_active_tab_activates_predecessor() {
        let tree = tabs(
            "t",
            "C",
            vec![
                tab("A", view("va", "x")),
                tab("B", view("vb", "x")),
                tab("C", view("vc", "x")),
            ],
        );
        let next = remove_tab(&tree, &id("t"), &TabId::from("C"));
        assert_eq!(next.as_tabs().unwrap().active_id, TabId::from("B"));

        let middle = update_tabs_active(&tree, &id("t"), &TabId::from("B"));
        let next = remove_tab(&middle, &id("t"), &TabId::from("B"));
        assert_eq!(next.as_tabs().unwrap().active_id, TabId::from("A"));
    }

    #[test]
    fn test_remove_inactive_tab_keeps_active() {
        let tree = tabs("t", "A", vec![tab("A", view("va", "x")), tab("B", view("vb", "y"))]);
        let next = remove_tab(&tree, &id("t"), &TabId::from("B"));
        assert_eq!(next.as_tabs().unwrap().active_id, TabId::from("A"));
    }

    #[test]
    fn test_remove_only_tab_collapses_into_child() {
        let inner = view("v", "camera");
        let tree = split(
            "s",
            view("left", "plot"),
            tabs("t", "A", vec![tab("A", inner.clone())]),
        );
        let next = remove_tab(&tree, &id("t"), &TabId::from("A"));
        assert!(next.find(&id("t")).is_none());
        assert_eq!(next.as_split().unwrap().children[1], inner);
        assert_valid(&next);
    }

    #[test]
    fn test_split_sizes_are_clamped() {
        let tree = split("s", view("a", "x"), view("b", "y"));
        let limits = LayoutLimits::default();

        let next = update_split_sizes(&tree, &id("s"), [0.05, 0.95], &limits);
        assert_eq!(next.as_split().unwrap().sizes, [0.15, 0.85]);

        let next = update_split_sizes(&tree, &id("s"), [0.7, 0.9], &limits);
        let [a, b] = next.as_split().unwrap().sizes;
        assert_eq!(a, 0.7);
        assert!((a + b - 1.0).abs() < 1e-12);

        let next = update_split_sizes(&tree, &id("s"), [f64::NAN, 0.5], &limits);
        assert_eq!(next, tree);
    }

    #[test]
    fn test_split_edits_ignore_non_splits() {
        let tree = split("s", view("a", "x"), view("b", "y"));
        let limits = LayoutLimits::default();
        assert_eq!(update_split_sizes(&tree, &id("a"), [0.3, 0.7], &limits), tree);
        assert_eq!(update_split_direction(&tree, &id("a"), SplitDirection::Column), tree);

        let next = update_split_direction(&tree, &id("s"), SplitDirection::Column);
        assert_eq!(next.as_split().unwrap().direction, SplitDirection::Column);
    }

    #[test]
    fn test_update_tabs_active_requires_existing_tab() {
        let tree = tabs("t", "A", vec![tab("A", view("va", "x")), tab("B", view("vb", "y"))]);
        assert_eq!(update_tabs_active(&tree, &id("t"), &TabId::from("Z")), tree);
        let next = update_tabs_active(&tree, &id("t"), &TabId::from("B"));
        assert_eq!(next.as_tabs().unwrap().active_id, TabId::from("B"));
    }

    #[test]
    fn test_add_and_rename_tab() {
        let tree = tabs("t", "A", vec![tab("A", view("va", "x"))]);
        let next = add_tab(&tree, &id("t"));
        let group = next.as_tabs().unwrap();
        assert_eq!(group.tabs.len(), 2);
        assert_eq!(group.tabs[1].title, "Tab 2");
        assert_eq!(group.active_id, TabId::from("A"));
        assert_eq!(
            group.tabs[1].child.as_view().unwrap().view_type,
            PLACEHOLDER_VIEW_TYPE
        );
        assert_valid(&next);

        let renamed = rename_tab(&next, &id("t"), &TabId::from("A"), "Cameras");
        assert_eq!(renamed.as_tabs().unwrap().tabs[0].title, "Cameras");
        assert_eq!(rename_tab(&next, &id("t"), &TabId::from("Z"), "nope"), next);
    }

    #[test]
    fn test_view_edits() {
        let tree = split("s", view("a", "placeholder"), view("b", "plot"));
        let next = update_view_type(&tree, &id("a"), "camera");
        let a = next.find(&id("a")).unwrap().as_view().unwrap();
        assert_eq!(a.view_type, "camera");
        assert!(a.config.is_empty());

        let mut config = ViewConfig::new();
        config.insert("topic".into(), serde_json::json!("/cam"));
        let next = update_view_config(&next, &id("a"), config.clone());
        assert_eq!(next.find(&id("a")).unwrap().as_view().unwrap().config, config);

        // Not a view: unchanged.
        assert_eq!(update_view_type(&tree, &id("s"), "camera"), tree);

        let replaced = replace_view(&tree, &id("b"), "status", config.clone());
        let b = replaced.find(&id("b")).unwrap().as_view().unwrap();
        assert_eq!(b.view_type, "status");
        assert_eq!(b.config, config);
    }

    #[test]
    fn test_delete_under_split_promotes_sibling() {
        let tree = split(
            "outer",
            view("a", "x"),
            split("inner", view("b", "y"), view("c", "z")),
        );
        let next = delete_node(&tree, &id("b"));
        let outer = next.as_split().unwrap();
        assert_eq!(outer.children[1], view("c", "z"));
        assert!(next.find(&id("inner")).is_none());
        assert_valid(&next);
    }

    #[test]
    fn test_delete_under_multi_tab_removes_tab() {
        let tree = tabs("t", "A", vec![tab("A", view("va", "x")), tab("B", view("vb", "y"))]);
        let next = delete_node(&tree, &id("va"));
        assert_eq!(next, remove_tab(&tree, &id("t"), &TabId::from("A")));
    }

    #[test]
    fn test_delete_under_single_tab_leaves_placeholder() {
        let tree = tabs("t", "A", vec![tab("A", view("va", "camera"))]);
        let next = delete_node(&tree, &id("va"));
        let group = next.as_tabs().expect("tabs node survives");
        assert_eq!(group.tabs.len(), 1);
        let child = group.tabs[0].child.as_view().unwrap();
        assert_eq!(child.view_type, PLACEHOLDER_VIEW_TYPE);
        assert_ne!(child.id, id("va"));
        assert_valid(&next);
    }

    #[test]
    fn test_delete_root_leaves_placeholder() {
        let tree = split("s", view("a", "x"), view("b", "y"));
        let next = delete_node(&tree, &id("s"));
        assert_eq!(next.as_view().unwrap().view_type, PLACEHOLDER_VIEW_TYPE);
        assert_eq!(next.node_count(), 1);
    }

    #[test]
    fn test_stale_ids_are_noops() {
        let tree = split("s", view("a", "x"), tabs("t", "A", vec![tab("A", view("va", "y"))]));
        let stale = id("gone");
        let limits = LayoutLimits::default();
        assert_eq!(delete_node(&tree, &stale), tree);
        assert_eq!(wrap_in_split(&tree, &stale, SplitDirection::Row), tree);
        assert_eq!(wrap_in_tabs(&tree, &stale), tree);
        assert_eq!(add_tab(&tree, &stale), tree);
        assert_eq!(remove_tab(&tree, &id("t"), &TabId::from("gone")), tree);
        assert_eq!(update_split_sizes(&tree, &stale, [0.3, 0.7], &limits), tree);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let tree = split("s", view("a", "x"), view("b", "y"));
        let before = tree.clone();
        let _ = delete_node(&tree, &id("a"));
        let _ = wrap_in_split(&tree, &id("b"), SplitDirection::Column);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_edit_wire_form() {
        let edit: BlueprintEdit =
            serde_json::from_str(r#"{"op": "wrap_in_split", "target": "a", "direction": "column"}"#)
                .unwrap();
        assert_eq!(edit.name(), "wrap_in_split");
        assert!(!edit.can_remove_nodes());

        let tree = view("a", "x");
        let next = edit.apply(&tree, &LayoutLimits::default());
        assert_eq!(next.as_split().unwrap().direction, SplitDirection::Column);

        let delete = BlueprintEdit::DeleteNode { node: id("a") };
        assert!(delete.can_remove_nodes());
    }
}
