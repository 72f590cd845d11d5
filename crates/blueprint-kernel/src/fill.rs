//! Filling view configs with registry defaults.

use blueprint_types::{BlueprintNode, ViewConfig};

use crate::registry::ViewRegistry;

/// Merge registry defaults under every view's config.
///
/// Keys already present in a view's config win, so user choices survive and
/// filling twice changes nothing. Unknown view types are left alone.
pub fn fill_default_config(
    tree: &BlueprintNode,
    topics: &[String],
    registry: &ViewRegistry,
) -> BlueprintNode {
    match tree {
        BlueprintNode::View(view) => {
            let Some(defaults) = registry.defaults_for(&view.view_type, topics) else {
                return tree.clone();
            };
            let mut next = view.clone();
            merge_under(&mut next.config, defaults);
            BlueprintNode::View(next)
        }
        BlueprintNode::Split(split) => {
            let mut next = split.clone();
            for child in next.children.iter_mut() {
                *child = fill_default_config(child, topics, registry);
            }
            BlueprintNode::Split(next)
        }
        BlueprintNode::Tabs(tabs) => {
            let mut next = tabs.clone();
            for tab in next.tabs.iter_mut() {
                tab.child = fill_default_config(&tab.child, topics, registry);
            }
            BlueprintNode::Tabs(next)
        }
    }
}

fn merge_under(config: &mut ViewConfig, defaults: ViewConfig) {
    for (key, value) in defaults {
        config.entry(key).or_insert(value);
    }
}
