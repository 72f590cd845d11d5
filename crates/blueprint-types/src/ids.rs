//! Typed identifiers for layout nodes, tabs, blueprints, and sessions.
//!
//! All ID types wrap an opaque string. Trees arrive from the backend and from
//! local drafts with ids minted elsewhere, so nothing here assumes a format.
//! Ids minted locally via `generate()` are UUIDv7 in simple (32 hex char)
//! form. The `short()` form is for human-facing output only and never used as a
//! lookup key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A layout node identifier (View, Split, or Tabs).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

/// A tab identifier within a Tabs node.
///
/// Tab ids share the uniqueness space of node ids within one tree.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

/// A named blueprint identifier, assigned by the backend catalogue.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlueprintId(String);

/// A live session identifier, assigned by the recording/teleop/inference service.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_string_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Mint a fresh, time-ordered id (UUIDv7, simple form).
            pub fn generate() -> Self {
                Self(uuid::Uuid::now_v7().as_simple().to_string())
            }

            /// Wrap an existing id string.
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// The raw id string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume into the raw id string.
            pub fn into_string(self) -> String {
                self.0
            }

            /// First 8 characters, for human display only, not lookup.
            pub fn short(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((end, _)) => &self.0[..end],
                    None => &self.0,
                }
            }

            /// Check if this id is the empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<String> for $T {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $T {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<$T> for String {
            fn from(id: $T) -> String {
                id.0
            }
        }

        impl AsRef<str> for $T {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $T {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $T {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.short())
            }
        }
    };
}

impl_string_id!(NodeId, "NodeId");
impl_string_id!(TabId, "TabId");
impl_string_id!(BlueprintId, "BlueprintId");
impl_string_id!(SessionId, "SessionId");

// ============================================================================
// Tests
// ============================================================================
