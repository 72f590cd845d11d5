//! Live session references.
//!
//! A session is an ephemeral runtime thing (a recording, a teleop run, an
//! inference job) owned by the remote service. The layout engine only ever
//! sees its kind and id; the backend binds that pair to a durable blueprint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::ids::SessionId;

/// Kind of live session a blueprint can be bound to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionKind {
    Recording,
    Teleop,
    Inference,
}

impl SessionKind {
    /// All kinds, in display order.
    pub const ALL: [SessionKind; 3] = [
        SessionKind::Recording,
        SessionKind::Teleop,
        SessionKind::Inference,
    ];

    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Recording => "recording",
            SessionKind::Teleop => "teleop",
            SessionKind::Inference => "inference",
        }
    }

    /// Capitalized label for human-facing names.
    pub fn label(&self) -> &'static str {
        match self {
            SessionKind::Recording => "Recording",
            SessionKind::Teleop => "Teleop",
            SessionKind::Inference => "Inference",
        }
    }
}

/// A (kind, id) pair naming one live session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionRef {
    pub kind: SessionKind,
    pub id: SessionId,
}

impl SessionRef {
    pub fn new(kind: SessionKind, id: impl Into<SessionId>) -> Self {
        Self { kind, id: id.into() }
    }
}

impl fmt::Display for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

// ============================================================================
// Tests
// ============================================================================
