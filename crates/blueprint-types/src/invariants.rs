//! Well-formedness rules for layout trees.
//!
//! The owned tree type already rules out shared children, cycles, and splits
//! with the wrong arity. What remains is checked here:
//!
//! | Rule                         | Violation                         |
//! |------------------------------|-----------------------------------|
//! | ids non-empty                | [`InvariantError::EmptyId`]       |
//! | node + tab ids unique        | [`InvariantError::DuplicateId`]   |
//! | tabs non-empty               | [`InvariantError::EmptyTabs`]     |
//! | `activeId` names a tab       | [`InvariantError::DanglingActiveTab`] |
//! | sizes finite                 | [`InvariantError::NonFiniteSize`] |
//! | sizes sum to 1 (± tolerance) | [`InvariantError::SizesDoNotSumToOne`] |
//! | sizes ≥ minimum              | [`InvariantError::SizeBelowMinimum`] |

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ids::{NodeId, TabId};
use crate::node::BlueprintNode;

/// Default lower bound for each split weight.
pub const DEFAULT_MIN_SPLIT_SIZE: f64 = 0.15;

/// Float tolerance for split-size checks.
pub const SIZE_TOLERANCE: f64 = 1e-6;

/// Numeric bounds applied to split sizes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutLimits {
    /// Lower bound for each split weight. In `(0, 0.5]`.
    pub min_split_size: f64,
}

impl Default for LayoutLimits {
    fn default() -> Self {
        Self {
            min_split_size: DEFAULT_MIN_SPLIT_SIZE,
        }
    }
}

impl LayoutLimits {
    /// Create limits, rejecting a minimum outside `(0, 0.5]`.
    pub fn new(min_split_size: f64) -> Result<Self, InvariantError> {
        if !(min_split_size > 0.0 && min_split_size <= 0.5) {
            return Err(InvariantError::InvalidLimit(min_split_size));
        }
        Ok(Self { min_split_size })
    }

    /// Clamp the first weight into `[min, 1 - min]` and derive the second.
    ///
    /// Returns `None` for non-finite input.
    pub fn clamp_sizes(&self, first: f64) -> Option<[f64; 2]> {
        if !first.is_finite() {
            return None;
        }
        let a = first.clamp(self.min_split_size, 1.0 - self.min_split_size);
        Some([a, 1.0 - a])
    }
}

/// A single invariant violation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantError {
    #[error("empty id on {kind} node")]
    EmptyId { kind: &'static str },

    #[error("duplicate id '{0}'")]
    DuplicateId(String),

    #[error("tabs node {tabs} has no tabs")]
    EmptyTabs { tabs: NodeId },

    #[error("tabs node {tabs}: active id '{active}' does not name a tab")]
    DanglingActiveTab { tabs: NodeId, active: TabId },

    #[error("split node {split}: non-finite size {sizes:?}")]
    NonFiniteSize { split: NodeId, sizes: [f64; 2] },

    #[error("split node {split}: sizes {sizes:?} do not sum to 1")]
    SizesDoNotSumToOne { split: NodeId, sizes: [f64; 2] },

    #[error("split node {split}: size {size} below minimum {min}")]
    SizeBelowMinimum { split: NodeId, size: f64, min: f64 },

    #[error("minimum split size {0} outside (0, 0.5]")]
    InvalidLimit(f64),
}

/// Collect every invariant violation in the tree.
///
/// An empty result means the tree is well-formed.
pub fn invariant_report(tree: &BlueprintNode, limits: &LayoutLimits) -> Vec<InvariantError> {
    let mut issues = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for node in tree.iter() {
        note_id(&mut seen, node.kind_str(), node.id().as_str(), &mut issues);
        match node {
            BlueprintNode::View(_) => {}
            BlueprintNode::Split(split) => {
                check_sizes(split.id.clone(), split.sizes, limits, &mut issues);
            }
            BlueprintNode::Tabs(tabs) => {
                if tabs.tabs.is_empty() {
                    issues.push(InvariantError::EmptyTabs {
                        tabs: tabs.id.clone(),
                    });
                } else if tabs.active_tab().is_none() {
                    issues.push(InvariantError::DanglingActiveTab {
                        tabs: tabs.id.clone(),
                        active: tabs.active_id.clone(),
                    });
                }
                for tab in &tabs.tabs {
                    note_id(&mut seen, "tab", tab.id.as_str(), &mut issues);
                }
            }
        }
    }

    issues
}

fn note_id<'a>(
    seen: &mut HashSet<&'a str>,
    kind: &'static str,
    raw: &'a str,
    issues: &mut Vec<InvariantError>,
) {
    if raw.is_empty() {
        issues.push(InvariantError::EmptyId { kind });
    } else if !seen.insert(raw) {
        issues.push(InvariantError::DuplicateId(raw.to_string()));
    }
}

fn check_sizes(split: NodeId, sizes: [f64; 2], limits: &LayoutLimits, issues: &mut Vec<InvariantError>) {
    if !sizes.iter().all(|s| s.is_finite()) {
        issues.push(InvariantError::NonFiniteSize { split, sizes });
        return;
    }
    if ((sizes[0] + sizes[1]) - 1.0).abs() > SIZE_TOLERANCE {
        issues.push(InvariantError::SizesDoNotSumToOne {
            split: split.clone(),
            sizes,
        });
    }
    for size in sizes {
        if size < limits.min_split_size - SIZE_TOLERANCE {
            issues.push(InvariantError::SizeBelowMinimum {
                split: split.clone(),
                size,
                min: limits.min_split_size,
            });
        }
    }
}

/// Validate a tree, returning the first violation found.
pub fn validate(tree: &BlueprintNode, limits: &LayoutLimits) -> Result<(), InvariantError> {
    match invariant_report(tree, limits).into_iter().next() {
        Some(issue) => Err(issue),
        None => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================
