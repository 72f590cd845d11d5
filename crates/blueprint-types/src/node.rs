//! The recursive layout tree.
//!
//! A blueprint is a tree of [`BlueprintNode`]s. Leaves are views that render
//! one external widget; interior nodes are binary splits or tab groups.
//!
//! ```text
//! Split (row, [0.6, 0.4])
//! ├── View  camera { topic: "/wrist/image" }
//! └── Tabs  active = t2
//!     ├── t1 "Tab 1" → View plot
//!     └── t2 "Tab 2" → View status
//! ```
//!
//! The wire form carries an explicit `type` discriminant and camelCase field
//! names, matching what the backend catalogue stores:
//!
//! ```json
//! { "type": "view", "id": "a1", "viewType": "camera", "config": {} }
//! ```
//!
//! Ownership is strictly parent-to-child; there are no back-pointers. Edits
//! rebuild the path from the root (see `blueprint-kernel::ops`).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::ids::{NodeId, TabId};

/// Opaque per-view configuration. Its shape is owned by the view registry.
pub type ViewConfig = serde_json::Map<String, serde_json::Value>;

/// View type of the hard-coded default leaf.
pub const PLACEHOLDER_VIEW_TYPE: &str = "placeholder";

/// A node in the layout tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlueprintNode {
    /// Leaf rendering one widget.
    View(ViewNode),
    /// Binary container along a row/column axis.
    Split(SplitNode),
    /// Ordered tab group with one active tab.
    Tabs(TabsNode),
}

/// Leaf node rendering one external widget selected by `view_type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNode {
    pub id: NodeId,
    pub view_type: String,
    #[serde(default)]
    pub config: ViewConfig,
}

/// Split axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SplitDirection {
    /// Children side by side.
    Row,
    /// Children stacked.
    Column,
}

/// Binary container. Always exactly two children.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitNode {
    pub id: NodeId,
    pub direction: SplitDirection,
    /// Fractional weights; each at least the configured minimum, summing to 1.
    pub sizes: [f64; 2],
    pub children: Box<[BlueprintNode; 2]>,
}

/// One entry of a [`TabsNode`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub child: BlueprintNode,
}

/// Tab group. Never empty; `active_id` always names one of `tabs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsNode {
    pub id: NodeId,
    pub active_id: TabId,
    pub tabs: Vec<Tab>,
}

// ============================================================================
// Constructors
// ============================================================================

/// The hard-coded default tree: a single placeholder view with a fresh id.
pub fn create_default_blueprint() -> BlueprintNode {
    BlueprintNode::View(ViewNode::placeholder())
}

impl ViewNode {
    /// A view with a fresh id and empty config.
    pub fn new(view_type: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            view_type: view_type.into(),
            config: ViewConfig::new(),
        }
    }

    /// A fresh placeholder view.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_VIEW_TYPE)
    }

    /// Builder: set config.
    pub fn with_config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }
}

impl SplitNode {
    /// An even split of two subtrees under a fresh id.
    pub fn new(direction: SplitDirection, first: BlueprintNode, second: BlueprintNode) -> Self {
        Self {
            id: NodeId::generate(),
            direction,
            sizes: [0.5, 0.5],
            children: Box::new([first, second]),
        }
    }
}

impl Tab {
    /// A tab with a fresh id.
    pub fn new(title: impl Into<String>, child: BlueprintNode) -> Self {
        Self {
            id: TabId::generate(),
            title: title.into(),
            child,
        }
    }
}

impl TabsNode {
    /// A tab group holding one tab, which is active.
    pub fn single(title: impl Into<String>, child: BlueprintNode) -> Self {
        let tab = Tab::new(title, child);
        Self {
            id: NodeId::generate(),
            active_id: tab.id.clone(),
            tabs: vec![tab],
        }
    }

    /// The tab named by `active_id`, if it resolves.
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == self.active_id)
    }

    /// Position of a tab by id.
    pub fn position(&self, tab_id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| &t.id == tab_id)
    }
}

impl From<ViewNode> for BlueprintNode {
    fn from(v: ViewNode) -> Self {
        BlueprintNode::View(v)
    }
}

impl From<SplitNode> for BlueprintNode {
    fn from(s: SplitNode) -> Self {
        BlueprintNode::Split(s)
    }
}

impl From<TabsNode> for BlueprintNode {
    fn from(t: TabsNode) -> Self {
        BlueprintNode::Tabs(t)
    }
}

// ============================================================================
// Traversal
// ============================================================================

impl BlueprintNode {
    /// This node's id.
    pub fn id(&self) -> &NodeId {
        match self {
            BlueprintNode::View(v) => &v.id,
            BlueprintNode::Split(s) => &s.id,
            BlueprintNode::Tabs(t) => &t.id,
        }
    }

    /// Short variant name for logs.
    pub fn kind_str(&self) -> &'static str {
        match self {
            BlueprintNode::View(_) => "view",
            BlueprintNode::Split(_) => "split",
            BlueprintNode::Tabs(_) => "tabs",
        }
    }

    pub fn as_view(&self) -> Option<&ViewNode> {
        match self {
            BlueprintNode::View(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_split(&self) -> Option<&SplitNode> {
        match self {
            BlueprintNode::Split(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tabs(&self) -> Option<&TabsNode> {
        match self {
            BlueprintNode::Tabs(t) => Some(t),
            _ => None,
        }
    }

    /// Direct children, in order (split children, then tab children).
    pub fn children(&self) -> Vec<&BlueprintNode> {
        match self {
            BlueprintNode::View(_) => Vec::new(),
            BlueprintNode::Split(s) => s.children.iter().collect(),
            BlueprintNode::Tabs(t) => t.tabs.iter().map(|tab| &tab.child).collect(),
        }
    }

    /// Pre-order depth-first iterator over this subtree.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Number of nodes in this subtree (tabs themselves are not nodes).
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// DFS lookup by node id. O(n).
    pub fn find(&self, id: &NodeId) -> Option<&BlueprintNode> {
        self.iter().find(|node| node.id() == id)
    }

    /// Whether a node with this id exists in the subtree.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }
}

/// DFS lookup by node id. Returns `None` for unknown ids.
pub fn find_node<'a>(tree: &'a BlueprintNode, id: &NodeId) -> Option<&'a BlueprintNode> {
    tree.find(id)
}

/// Pre-order iterator returned by [`BlueprintNode::iter`].
pub struct Iter<'a> {
    stack: Vec<&'a BlueprintNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a BlueprintNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        match node {
            BlueprintNode::View(_) => {}
            BlueprintNode::Split(s) => {
                self.stack.push(&s.children[1]);
                self.stack.push(&s.children[0]);
            }
            BlueprintNode::Tabs(t) => {
                self.stack.extend(t.tabs.iter().rev().map(|tab| &tab.child));
            }
        }
        Some(node)
    }
}

// ============================================================================
// Tests
// ============================================================================
