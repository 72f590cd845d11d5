//! In-process blueprint catalogue.
//!
//! Same semantics as the HTTP service, without the network. Used in tests and
//! for offline runs. Deleting a blueprint drops every session binding that
//! pointed at it.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use blueprint_types::{
    BlueprintDetail, BlueprintId, BlueprintNode, BlueprintSummary, SessionId, SessionKind,
    UpdateBlueprint,
};

use crate::api::{BlueprintApi, ClientError, ClientResult};

/// Per-operation call counters.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub list: AtomicUsize,
    pub create: AtomicUsize,
    pub get: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
    pub resolve: AtomicUsize,
    pub bind: AtomicUsize,
}

impl CallCounts {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn creates(&self) -> usize {
        self.create.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.update.load(Ordering::SeqCst)
    }

    pub fn binds(&self) -> usize {
        self.bind.load(Ordering::SeqCst)
    }

    pub fn resolves(&self) -> usize {
        self.resolve.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
struct Catalogue {
    // Ordered by id so listings are stable.
    blueprints: BTreeMap<BlueprintId, BlueprintDetail>,
    bindings: HashMap<(SessionKind, SessionId), BlueprintId>,
    // Logical clock for timestamps.
    clock: u64,
}

impl Catalogue {
    fn tick(&mut self) -> String {
        self.clock += 1;
        format!("t{:06}", self.clock)
    }
}

/// In-memory [`BlueprintApi`].
#[derive(Debug, Default)]
pub struct MemoryBlueprintApi {
    catalogue: RwLock<Catalogue>,
    offline: AtomicBool,
    calls: CallCounts,
}

impl MemoryBlueprintApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blueprint directly, bypassing counters.
    pub fn insert(&self, name: &str, tree: BlueprintNode) -> BlueprintDetail {
        let mut catalogue = self.catalogue.write();
        let stamp = catalogue.tick();
        let detail = BlueprintDetail {
            id: BlueprintId::generate(),
            name: name.to_string(),
            tree,
            created_at: Some(stamp.clone()),
            updated_at: Some(stamp),
        };
        catalogue.blueprints.insert(detail.id.clone(), detail.clone());
        detail
    }

    /// When offline, every call fails with [`ClientError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.catalogue.read().blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current binding for a session, if any.
    pub fn binding(&self, kind: SessionKind, session_id: &SessionId) -> Option<BlueprintId> {
        self.catalogue
            .read()
            .bindings
            .get(&(kind, session_id.clone()))
            .cloned()
    }

    fn check_online(&self) -> ClientResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(ClientError::Unavailable("memory backend is offline".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BlueprintApi for MemoryBlueprintApi {
    async fn list(&self) -> ClientResult<Vec<BlueprintSummary>> {
        CallCounts::bump(&self.calls.list);
        self.check_online()?;
        Ok(self
            .catalogue
            .read()
            .blueprints
            .values()
            .map(BlueprintDetail::summary)
            .collect())
    }

    async fn create(&self, name: &str, tree: &BlueprintNode) -> ClientResult<BlueprintDetail> {
        CallCounts::bump(&self.calls.create);
        self.check_online()?;
        Ok(self.insert(name, tree.clone()))
    }

    async fn get(&self, id: &BlueprintId) -> ClientResult<BlueprintDetail> {
        CallCounts::bump(&self.calls.get);
        self.check_online()?;
        self.catalogue
            .read()
            .blueprints
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(id.clone()))
    }

    async fn update(
        &self,
        id: &BlueprintId,
        update: &UpdateBlueprint,
    ) -> ClientResult<BlueprintDetail> {
        CallCounts::bump(&self.calls.update);
        self.check_online()?;
        let mut catalogue = self.catalogue.write();
        let stamp = catalogue.tick();
        let detail = catalogue
            .blueprints
            .get_mut(id)
            .ok_or_else(|| ClientError::NotFound(id.clone()))?;
        if let Some(name) = &update.name {
            detail.name = name.clone();
        }
        if let Some(tree) = &update.tree {
            detail.tree = tree.clone();
        }
        detail.updated_at = Some(stamp);
        Ok(detail.clone())
    }

    async fn delete(&self, id: &BlueprintId) -> ClientResult<()> {
        CallCounts::bump(&self.calls.delete);
        self.check_online()?;
        let mut catalogue = self.catalogue.write();
        if catalogue.blueprints.remove(id).is_none() {
            return Err(ClientError::NotFound(id.clone()));
        }
        catalogue.bindings.retain(|_, bound| bound != id);
        Ok(())
    }

    async fn resolve_session(
        &self,
        kind: SessionKind,
        session_id: &SessionId,
    ) -> ClientResult<Option<BlueprintDetail>> {
        CallCounts::bump(&self.calls.resolve);
        self.check_online()?;
        let catalogue = self.catalogue.read();
        Ok(catalogue
            .bindings
            .get(&(kind, session_id.clone()))
            .and_then(|id| catalogue.blueprints.get(id))
            .cloned())
    }

    async fn bind_session(
        &self,
        kind: SessionKind,
        session_id: &SessionId,
        blueprint_id: &BlueprintId,
    ) -> ClientResult<()> {
        CallCounts::bump(&self.calls.bind);
        self.check_online()?;
        let mut catalogue = self.catalogue.write();
        if !catalogue.blueprints.contains_key(blueprint_id) {
            return Err(ClientError::NotFound(blueprint_id.clone()));
        }
        catalogue
            .bindings
            .insert((kind, session_id.clone()), blueprint_id.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_types::create_default_blueprint;

    #[tokio::test]
    async fn test_crud() {
        let api = MemoryBlueprintApi::new();
        let created = api.create("Main", &create_default_blueprint()).await.unwrap();
        assert_eq!(api.list().await.unwrap().len(), 1);

        let fetched = api.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);

        let updated = api
            .update(&created.id, &UpdateBlueprint::name("Renamed"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.tree, created.tree);
        assert_ne!(updated.updated_at, created.updated_at);

        api.delete(&created.id).await.unwrap();
        assert!(api.get(&created.id).await.unwrap_err().is_not_found());
        assert!(api.delete(&created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_bindings_follow_deletes() {
        let api = MemoryBlueprintApi::new();
        let session = SessionId::from("run-1");
        let bp = api.insert("Teleop layout", create_default_blueprint());

        assert!(api.resolve_session(SessionKind::Teleop, &session).await.unwrap().is_none());
        api.bind_session(SessionKind::Teleop, &session, &bp.id).await.unwrap();
        let resolved = api.resolve_session(SessionKind::Teleop, &session).await.unwrap();
        assert_eq!(resolved.map(|d| d.id), Some(bp.id.clone()));

        // Same session id under another kind is a different session.
        assert!(api.resolve_session(SessionKind::Recording, &session).await.unwrap().is_none());

        api.delete(&bp.id).await.unwrap();
        assert!(api.binding(SessionKind::Teleop, &session).is_none());
    }

    #[tokio::test]
    async fn test_bind_unknown_blueprint() {
        let api = MemoryBlueprintApi::new();
        let err = api
            .bind_session(SessionKind::Inference, &SessionId::from("s"), &BlueprintId::from("nope"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_offline_fails_everything() {
        let api = MemoryBlueprintApi::new();
        api.set_offline(true);
        assert!(matches!(api.list().await, Err(ClientError::Unavailable(_))));
        assert!(matches!(
            api.create("x", &create_default_blueprint()).await,
            Err(ClientError::Unavailable(_))
        ));
        assert!(api.is_empty());
        assert_eq!(api.calls().creates(), 1);

        api.set_offline(false);
        assert!(api.list().await.unwrap().is_empty());
    }
}
