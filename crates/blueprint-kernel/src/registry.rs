//! View type registry: default-config generators keyed by view type.
//!
//! Rendering is someone else's job. The engine only needs to know, for each
//! view type, what config a freshly placed pane should start with given the
//! live topic list.

use std::collections::BTreeMap;
use std::fmt;

use blueprint_types::{PLACEHOLDER_VIEW_TYPE, ViewConfig};
use serde_json::{Value, json};

/// Produces a default config from the live topic list.
pub type ConfigGenerator = Box<dyn Fn(&[String]) -> ViewConfig + Send + Sync>;

/// Maximum number of topics a fresh plot pane subscribes to.
pub const PLOT_DEFAULT_TOPICS: usize = 4;

/// Default plot window, in seconds.
pub const PLOT_DEFAULT_WINDOW_SECS: u64 = 10;

/// Registry of view types and their default-config generators.
///
/// Names are ordered so listings are stable.
pub struct ViewRegistry {
    generators: BTreeMap<String, ConfigGenerator>,
}

impl ViewRegistry {
    /// An empty registry (every view type gets no defaults).
    pub fn new() -> Self {
        Self {
            generators: BTreeMap::new(),
        }
    }

    /// Registry with the built-in view types: placeholder, camera, plot, status.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(PLACEHOLDER_VIEW_TYPE, |_| ViewConfig::new());
        registry.register("camera", camera_defaults);
        registry.register("plot", plot_defaults);
        registry.register("status", status_defaults);
        registry
    }

    /// Register a view type. A second registration under the same name
    /// replaces the first.
    pub fn register<F>(&mut self, name: impl Into<String>, generator: F)
    where
        F: Fn(&[String]) -> ViewConfig + Send + Sync + 'static,
    {
        let name = name.into();
        if self.generators.insert(name.clone(), Box::new(generator)).is_some() {
            tracing::debug!(view_type = %name, "view type generator replaced");
        }
    }

    /// Defaults for `view_type`, or `None` when the type is unknown.
    pub fn defaults_for(&self, view_type: &str, topics: &[String]) -> Option<ViewConfig> {
        self.generators.get(view_type).map(|generate| generate(topics))
    }

    pub fn contains(&self, view_type: &str) -> bool {
        self.generators.contains_key(view_type)
    }

    /// Registered view type names, sorted.
    pub fn view_types(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("view_types", &self.generators.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ── Built-in generators ──

fn camera_defaults(topics: &[String]) -> ViewConfig {
    let topic = topics
        .iter()
        .find(|t| t.contains("image") || t.contains("camera"))
        .or_else(|| topics.first());

    let mut config = ViewConfig::new();
    if let Some(topic) = topic {
        config.insert("topic".into(), Value::String(topic.clone()));
    }
    config.insert("fit".into(), json!("contain"));
    config
}

fn plot_defaults(topics: &[String]) -> ViewConfig {
    let selected: Vec<&String> = topics.iter().take(PLOT_DEFAULT_TOPICS).collect();
    let mut config = ViewConfig::new();
    config.insert("topics".into(), json!(selected));
    config.insert("window_secs".into(), json!(PLOT_DEFAULT_WINDOW_SECS));
    config
}

fn status_defaults(topics: &[String]) -> ViewConfig {
    let mut config = ViewConfig::new();
    if let Some(topic) = topics.first() {
        config.insert("topic".into(), Value::String(topic.clone()));
    }
    config
}
