//! Manager behaviour while backend calls are slow or fail midway.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use blueprint_client::{BlueprintApi, ClientResult, MemoryBlueprintApi};
use blueprint_console::{BlueprintManager, Dispatch, ManagerError};
use blueprint_kernel::{MemoryDraftStore, ops};
use blueprint_types::{
    BlueprintDetail, BlueprintId, BlueprintNode, BlueprintSummary, SessionId, SessionKind,
    SessionRef, SplitDirection, UpdateBlueprint,
};

/// Memory catalogue with switches for slow and failing calls.
///
/// While `armed`, the next `get` parks until released; `park_update` does
/// the same for `update`. `offline_after_delete` takes the backend offline
/// right after the next successful delete.
struct GatedApi {
    inner: MemoryBlueprintApi,
    armed: AtomicBool,
    park_update: AtomicBool,
    offline_after_delete: AtomicBool,
    release: Notify,
}

impl GatedApi {
    fn new() -> Self {
        Self {
            inner: MemoryBlueprintApi::new(),
            armed: AtomicBool::new(false),
            park_update: AtomicBool::new(false),
            offline_after_delete: AtomicBool::new(false),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl BlueprintApi for GatedApi {
    async fn list(&self) -> ClientResult<Vec<BlueprintSummary>> {
        self.inner.list().await
    }

    async fn create(&self, name: &str, tree: &BlueprintNode) -> ClientResult<BlueprintDetail> {
        self.inner.create(name, tree).await
    }

    async fn get(&self, id: &BlueprintId) -> ClientResult<BlueprintDetail> {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.release.notified().await;
        }
        self.inner.get(id).await
    }

    async fn update(
        &self,
        id: &BlueprintId,
        update: &UpdateBlueprint,
    ) -> ClientResult<BlueprintDetail> {
        if self.park_update.swap(false, Ordering::SeqCst) {
            self.release.notified().await;
        }
        self.inner.update(id, update).await
    }

    async fn delete(&self, id: &BlueprintId) -> ClientResult<()> {
        self.inner.delete(id).await?;
        if self.offline_after_delete.swap(false, Ordering::SeqCst) {
            self.inner.set_offline(true);
        }
        Ok(())
    }

    async fn resolve_session(
        &self,
        kind: SessionKind,
        session_id: &SessionId,
    ) -> ClientResult<Option<BlueprintDetail>> {
        self.inner.resolve_session(kind, session_id).await
    }

    async fn bind_session(
        &self,
        kind: SessionKind,
        session_id: &SessionId,
        blueprint_id: &BlueprintId,
    ) -> ClientResult<()> {
        self.inner.bind_session(kind, session_id, blueprint_id).await
    }
}

fn manager(api: Arc<GatedApi>) -> BlueprintManager {
    manager_with_drafts(api, Arc::new(MemoryDraftStore::new()))
}

fn manager_with_drafts(api: Arc<GatedApi>, drafts: Arc<MemoryDraftStore>) -> BlueprintManager {
    BlueprintManager::new(api, drafts, SessionRef::new(SessionKind::Recording, "rec-9"))
}

#[tokio::test]
async fn test_second_call_skipped_while_loading() {
    let api = Arc::new(GatedApi::new());
    let manager = manager(api.clone());
    manager.resolve_session_blueprint().await.unwrap();
    let id = manager.snapshot().blueprint_id.unwrap();

    api.armed.store(true, Ordering::SeqCst);
    let (opened, (saved, refreshed)) = tokio::join!(manager.open_blueprint(&id), async {
        assert!(manager.snapshot().busy);
        let saved = manager.save_blueprint().await;
        let refreshed = manager.refresh_saved_blueprints().await;
        api.release.notify_one();
        (saved, refreshed)
    });

    assert_eq!(opened.unwrap(), Dispatch::Completed);
    assert_eq!(saved.unwrap(), Dispatch::Skipped);
    assert_eq!(refreshed.unwrap(), Dispatch::Skipped);
    assert_eq!(api.inner.calls().updates(), 0);

    let snap = manager.snapshot();
    assert!(!snap.busy);
    assert!(!snap.action_pending);
    assert!(manager.take_notices().is_empty());

    // Gate is clear again.
    assert_eq!(manager.save_blueprint().await.unwrap(), Dispatch::Completed);
    assert_eq!(api.inner.calls().updates(), 1);
}

#[tokio::test]
async fn test_load_skipped_while_action_pending() {
    let api = Arc::new(GatedApi::new());
    let manager = manager(api.clone());
    manager.resolve_session_blueprint().await.unwrap();
    let resolves_before = api.inner.calls().resolves();

    api.park_update.store(true, Ordering::SeqCst);
    let (saved, resolved) = tokio::join!(manager.save_blueprint(), async {
        let snap = manager.snapshot();
        assert!(snap.action_pending && !snap.busy);
        let resolved = manager.resolve_session_blueprint().await;
        api.release.notify_one();
        resolved
    });

    assert_eq!(saved.unwrap(), Dispatch::Completed);
    assert_eq!(resolved.unwrap(), Dispatch::Skipped);
    assert_eq!(api.inner.calls().resolves(), resolves_before);
    assert!(!manager.snapshot().action_pending);
}

#[tokio::test]
async fn test_reset_runs_as_busy() {
    let api = Arc::new(GatedApi::new());
    let manager = manager(api.clone());
    manager.resolve_session_blueprint().await.unwrap();

    // Reset fetches the saved tree with `get`, which parks.
    api.armed.store(true, Ordering::SeqCst);
    let (reset, duplicated) = tokio::join!(manager.reset_blueprint(), async {
        let snap = manager.snapshot();
        assert!(snap.busy && !snap.action_pending);
        let duplicated = manager.duplicate_blueprint().await;
        api.release.notify_one();
        duplicated
    });

    assert_eq!(reset.unwrap(), Dispatch::Completed);
    assert_eq!(duplicated.unwrap(), Dispatch::Skipped);
    assert_eq!(api.inner.calls().creates(), 1);
}

#[tokio::test]
async fn test_edit_during_save_is_kept() {
    let api = Arc::new(GatedApi::new());
    let drafts = Arc::new(MemoryDraftStore::new());
    let manager = manager_with_drafts(api.clone(), drafts.clone());
    manager.resolve_session_blueprint().await.unwrap();
    let id = manager.snapshot().blueprint_id.unwrap();

    api.park_update.store(true, Ordering::SeqCst);
    let (saved, edited) = tokio::join!(manager.save_blueprint(), async {
        let edited = manager
            .edit(|tree| ops::wrap_in_split(tree, tree.id(), SplitDirection::Row))
            .unwrap();
        api.release.notify_one();
        edited
    });
    assert_eq!(saved.unwrap(), Dispatch::Completed);
    assert!(edited);

    // The server has the pre-edit tree; the edit survives locally.
    let snap = manager.snapshot();
    assert!(snap.tree.as_split().is_some());
    assert!(snap.has_draft);
    assert_eq!(drafts.len(), 1);
    assert_eq!(api.inner.get(&id).await.unwrap().tree.node_count(), 1);

    // Saving again pushes the edit and drops the draft.
    assert_eq!(manager.save_blueprint().await.unwrap(), Dispatch::Completed);
    assert_eq!(api.inner.get(&id).await.unwrap().tree, snap.tree);
    assert!(!manager.snapshot().has_draft);
    assert!(drafts.is_empty());
}

#[tokio::test]
async fn test_delete_forgets_blueprint_when_reload_fails() {
    let api = Arc::new(GatedApi::new());
    let manager = manager(api.clone());
    manager.resolve_session_blueprint().await.unwrap();
    let deleted = manager.snapshot().blueprint_id.unwrap();

    api.offline_after_delete.store(true, Ordering::SeqCst);
    assert!(manager.delete_blueprint().await.is_err());
    let snap = manager.snapshot();
    assert_eq!(snap.blueprint_id, None);
    assert_eq!(snap.bound_blueprint_id, None);
    assert!(!snap.has_draft);
    assert!(snap.saved_blueprints.is_empty());
    assert!(matches!(
        manager.save_blueprint().await,
        Err(ManagerError::NoBlueprint)
    ));

    api.inner.set_offline(false);
    assert_eq!(
        manager.resolve_session_blueprint().await.unwrap(),
        Dispatch::Completed
    );
    let snap = manager.snapshot();
    assert!(snap.blueprint_id.is_some());
    assert_ne!(snap.blueprint_id, Some(deleted));
    assert_eq!(snap.blueprint_id, snap.bound_blueprint_id);
}

#[tokio::test]
async fn test_flags_clear_after_failure() {
    let api = Arc::new(GatedApi::new());
    let manager = manager(api.clone());
    manager.resolve_session_blueprint().await.unwrap();

    api.inner.set_offline(true);
    assert!(manager.open_blueprint(&BlueprintId::from("x")).await.is_err());
    assert!(manager.delete_blueprint().await.is_err());
    let snap = manager.snapshot();
    assert!(!snap.busy && !snap.action_pending);
    assert_eq!(manager.take_notices().len(), 2);

    api.inner.set_offline(false);
    assert_eq!(
        manager.refresh_saved_blueprints().await.unwrap(),
        Dispatch::Completed
    );
}
