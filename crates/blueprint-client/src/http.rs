//! HTTP implementation of [`BlueprintApi`].
//!
//! Paths, relative to the base URL:
//!
//! ```text
//! GET    /blueprints                    → [summary]
//! POST   /blueprints                    → detail
//! GET    /blueprints/{id}               → detail
//! PUT    /blueprints/{id}               → detail
//! DELETE /blueprints/{id}               → (ignored)
//! POST   /blueprints/session/resolve    → detail, 404 when unbound
//! PUT    /blueprints/session/binding    → (ignored)
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use blueprint_types::{
    BlueprintDetail, BlueprintId, BlueprintNode, BlueprintSummary, CreateBlueprint,
    ResolveSessionRequest, SessionBindingRequest, SessionId, SessionKind, UpdateBlueprint,
};

use crate::api::{BlueprintApi, ClientError, ClientResult};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest error body kept in [`ClientError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// reqwest-backed catalogue client.
#[derive(Debug, Clone)]
pub struct HttpBlueprintClient {
    client: Client,
    base_url: Url,
}

impl HttpBlueprintClient {
    /// Client for `base_url` (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with path segments appended. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send and fail on any non-success status.
    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());
        Err(ClientError::Status {
            status: status.as_u16(),
            body: truncate(&body, MAX_ERROR_BODY),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Map a 404 on a blueprint path to [`ClientError::NotFound`].
fn not_found_for(id: &BlueprintId) -> impl FnOnce(ClientError) -> ClientError + '_ {
    move |err| match err {
        ClientError::Status { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
            ClientError::NotFound(id.clone())
        }
        other => other,
    }
}

fn truncate(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}

#[async_trait]
impl BlueprintApi for HttpBlueprintClient {
    async fn list(&self) -> ClientResult<Vec<BlueprintSummary>> {
        let url = self.endpoint(&["blueprints"])?;
        self.send_json(self.client.get(url)).await
    }

    async fn create(&self, name: &str, tree: &BlueprintNode) -> ClientResult<BlueprintDetail> {
        let url = self.endpoint(&["blueprints"])?;
        let body = CreateBlueprint {
            name: name.to_string(),
            tree: tree.clone(),
        };
        let detail: BlueprintDetail = self.send_json(self.client.post(url).json(&body)).await?;
        tracing::debug!(blueprint = %detail.id, name, "blueprint created");
        Ok(detail)
    }

    async fn get(&self, id: &BlueprintId) -> ClientResult<BlueprintDetail> {
        let url = self.endpoint(&["blueprints", id.as_str()])?;
        self.send_json(self.client.get(url))
            .await
            .map_err(not_found_for(id))
    }

    async fn update(
        &self,
        id: &BlueprintId,
        update: &UpdateBlueprint,
    ) -> ClientResult<BlueprintDetail> {
        let url = self.endpoint(&["blueprints", id.as_str()])?;
        self.send_json(self.client.put(url).json(update))
            .await
            .map_err(not_found_for(id))
    }

    async fn delete(&self, id: &BlueprintId) -> ClientResult<()> {
        let url = self.endpoint(&["blueprints", id.as_str()])?;
        self.send(self.client.delete(url))
            .await
            .map_err(not_found_for(id))?;
        Ok(())
    }

    async fn resolve_session(
        &self,
        kind: SessionKind,
        session_id: &SessionId,
    ) -> ClientResult<Option<BlueprintDetail>> {
        let url = self.endpoint(&["blueprints", "session", "resolve"])?;
        let body = ResolveSessionRequest {
            session_kind: kind,
            session_id: session_id.clone(),
        };
        match self.send_json(self.client.post(url).json(&body)).await {
            Ok(detail) => Ok(Some(detail)),
            Err(ClientError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                tracing::debug!(%kind, session = %session_id, "session is unbound");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn bind_session(
        &self,
        kind: SessionKind,
        session_id: &SessionId,
        blueprint_id: &BlueprintId,
    ) -> ClientResult<()> {
        let url = self.endpoint(&["blueprints", "session", "binding"])?;
        let body = SessionBindingRequest {
            session_kind: kind,
            session_id: session_id.clone(),
            blueprint_id: blueprint_id.clone(),
        };
        self.send(self.client.put(url).json(&body)).await?;
        Ok(())
    }
}
