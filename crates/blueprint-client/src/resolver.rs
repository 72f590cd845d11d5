//! Session-to-blueprint resolution.
//!
//! The backend owns the binding. When a session has none yet, a fresh
//! default blueprint is created and bound, so the second resolve of the same
//! session returns the same blueprint.

use std::sync::Arc;

use blueprint_types::{
    BlueprintDetail, BlueprintId, SessionId, SessionKind, SessionRef, create_default_blueprint,
};

use crate::api::{BlueprintApi, ClientResult};

/// Name given to a blueprint created for an unbound session.
pub fn default_blueprint_name(kind: SessionKind) -> String {
    format!("{} layout", kind.label())
}

/// Resolves sessions to blueprints, creating and binding one on first use.
#[derive(Clone)]
pub struct SessionResolver {
    api: Arc<dyn BlueprintApi>,
}

impl SessionResolver {
    pub fn new(api: Arc<dyn BlueprintApi>) -> Self {
        Self { api }
    }

    /// The blueprint for a session. Always yields one.
    pub async fn resolve(
        &self,
        kind: SessionKind,
        session_id: &SessionId,
    ) -> ClientResult<BlueprintDetail> {
        if let Some(detail) = self.api.resolve_session(kind, session_id).await? {
            tracing::debug!(%kind, session = %session_id, blueprint = %detail.id, "session resolved");
            return Ok(detail);
        }

        let name = default_blueprint_name(kind);
        let detail = self.api.create(&name, &create_default_blueprint()).await?;
        if let Err(e) = self.api.bind_session(kind, session_id, &detail.id).await {
            // An unbound blueprint would be duplicated by the next resolve.
            if let Err(cleanup) = self.api.delete(&detail.id).await {
                tracing::warn!(
                    blueprint = %detail.id,
                    error = %cleanup,
                    "failed to remove blueprint after bind failure"
                );
            }
            return Err(e);
        }
        tracing::info!(
            %kind,
            session = %session_id,
            blueprint = %detail.id,
            "created and bound default blueprint"
        );
        Ok(detail)
    }

    /// Convenience for a [`SessionRef`].
    pub async fn resolve_ref(&self, session: &SessionRef) -> ClientResult<BlueprintDetail> {
        self.resolve(session.kind, &session.id).await
    }

    /// Bind a session to an existing blueprint.
    pub async fn bind(
        &self,
        kind: SessionKind,
        session_id: &SessionId,
        blueprint_id: &BlueprintId,
    ) -> ClientResult<()> {
        self.api.bind_session(kind, session_id, blueprint_id).await?;
        tracing::info!(%kind, session = %session_id, blueprint = %blueprint_id, "session rebound");
        Ok(())
    }
}
