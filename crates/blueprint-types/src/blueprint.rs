//! Named blueprints and the backend catalogue's request/response bodies.
//!
//! On the wire the tree travels under the key `blueprint`; in Rust it is
//! called `tree` to keep "blueprint" for the named record itself.

use serde::{Deserialize, Serialize};

use crate::ids::{BlueprintId, SessionId};
use crate::node::BlueprintNode;
use crate::session::SessionKind;

/// Catalogue listing entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintSummary {
    pub id: BlueprintId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A named blueprint with its full tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlueprintDetail {
    pub id: BlueprintId,
    pub name: String,
    #[serde(rename = "blueprint")]
    pub tree: BlueprintNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl BlueprintDetail {
    /// The listing entry for this blueprint.
    pub fn summary(&self) -> BlueprintSummary {
        BlueprintSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

/// `POST /blueprints` body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateBlueprint {
    pub name: String,
    #[serde(rename = "blueprint")]
    pub tree: BlueprintNode,
}

/// `PUT /blueprints/{id}` body. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBlueprint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "blueprint", skip_serializing_if = "Option::is_none")]
    pub tree: Option<BlueprintNode>,
}

impl UpdateBlueprint {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            tree: None,
        }
    }

    pub fn tree(tree: BlueprintNode) -> Self {
        Self {
            name: None,
            tree: Some(tree),
        }
    }

    /// Builder: also set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// `POST /blueprints/session/resolve` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveSessionRequest {
    pub session_kind: SessionKind,
    pub session_id: SessionId,
}

/// `PUT /blueprints/session/binding` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBindingRequest {
    pub session_kind: SessionKind,
    pub session_id: SessionId,
    pub blueprint_id: BlueprintId,
}

// ============================================================================
// Tests
// ============================================================================
