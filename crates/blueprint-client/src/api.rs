//! The blueprint catalogue interface.

use async_trait::async_trait;
use thiserror::Error;

use blueprint_types::{
    BlueprintDetail, BlueprintId, BlueprintNode, BlueprintSummary, SessionId, SessionKind,
    UpdateBlueprint,
};

/// Errors talking to the blueprint catalogue.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status other than a handled 404.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The named blueprint does not exist.
    #[error("blueprint not found: {0}")]
    NotFound(BlueprintId),

    /// Response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Base URL cannot carry path segments.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Backend unreachable (offline test backend).
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// CRUD and session binding for named blueprints.
///
/// Implementations never cache; every call reaches the backend.
#[async_trait]
pub trait BlueprintApi: Send + Sync {
    /// All saved blueprints.
    async fn list(&self) -> ClientResult<Vec<BlueprintSummary>>;

    async fn create(&self, name: &str, tree: &BlueprintNode) -> ClientResult<BlueprintDetail>;

    async fn get(&self, id: &BlueprintId) -> ClientResult<BlueprintDetail>;

    /// Change name and/or tree. Returns the stored result.
    async fn update(&self, id: &BlueprintId, update: &UpdateBlueprint)
    -> ClientResult<BlueprintDetail>;

    async fn delete(&self, id: &BlueprintId) -> ClientResult<()>;

    /// The blueprint bound to a session, or `None` when unbound.
    async fn resolve_session(
        &self,
        kind: SessionKind,
        session_id: &SessionId,
    ) -> ClientResult<Option<BlueprintDetail>>;

    /// Bind a session to a blueprint, replacing any earlier binding.
    async fn bind_session(
        &self,
        kind: SessionKind,
        session_id: &SessionId,
        blueprint_id: &BlueprintId,
    ) -> ClientResult<()>;
}
