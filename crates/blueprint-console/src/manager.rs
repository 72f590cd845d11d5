//! Blueprint manager: the layout state behind one console page.
//!
//! The manager owns the current blueprint (id, name, tree), the selection,
//! the session binding, and the cached catalogue listing. Network operations
//! go through [`BlueprintApi`]; unsaved edits go to a [`DraftStore`] keyed by
//! (session, blueprint).
//!
//! ## Gating
//!
//! Two flags serialize network work: `action_pending` while a save is in
//! flight and `busy` for everything else (resolve, open, select, refresh,
//! duplicate, delete, reset). While either is set, every network operation
//! returns [`Dispatch::Skipped`] and does nothing. Flags are cleared by a
//! guard, so an early return or error never leaves the manager stuck.
//!
//! Local edits are never gated. A save only adopts the server's copy and
//! drops the draft when the tree and name are still the ones it sent.
//!
//! ## Failure
//!
//! A failed operation leaves the state as it was before the call and queues
//! an error [`Notice`]. The error is also returned to the caller. The one
//! exception is a delete that fails after the server removed the blueprint:
//! the manager then forgets the blueprint, so the next resolve starts clean.
//!
//! The state lock is never held across an await.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use blueprint_client::{BlueprintApi, ClientError, SessionResolver};
use blueprint_kernel::{
    BlueprintEdit, DraftError, DraftKey, DraftStore, ViewRegistry, ensure_valid_selection,
    fill_default_config,
};
use blueprint_types::{
    BlueprintDetail, BlueprintId, BlueprintNode, BlueprintSummary, LayoutLimits, NodeId,
    SessionRef, UpdateBlueprint, create_default_blueprint,
};

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    /// No blueprint is loaded yet.
    #[error("no blueprint loaded")]
    NoBlueprint,
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Whether a gated operation ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Completed,
    /// Another operation was in flight; nothing happened.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing message queued by the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Point-in-time copy of the manager's state.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerSnapshot {
    pub blueprint_id: Option<BlueprintId>,
    pub name: String,
    pub tree: BlueprintNode,
    pub bound_blueprint_id: Option<BlueprintId>,
    pub selected: NodeId,
    pub has_draft: bool,
    pub saved_blueprints: Vec<BlueprintSummary>,
    pub topics: Vec<String>,
    pub busy: bool,
    pub action_pending: bool,
}

#[derive(Debug)]
struct ManagerState {
    busy: bool,
    action_pending: bool,
    blueprint_id: Option<BlueprintId>,
    name: String,
    tree: BlueprintNode,
    bound_blueprint_id: Option<BlueprintId>,
    selected: NodeId,
    has_draft: bool,
    saved_blueprints: Vec<BlueprintSummary>,
    notices: Vec<Notice>,
    topics: Vec<String>,
}

impl ManagerState {
    fn new() -> Self {
        let tree = create_default_blueprint();
        Self {
            busy: false,
            action_pending: false,
            blueprint_id: None,
            name: String::new(),
            selected: tree.id().clone(),
            tree,
            bound_blueprint_id: None,
            has_draft: false,
            saved_blueprints: Vec::new(),
            notices: Vec::new(),
            topics: Vec::new(),
        }
    }
}

// ============================================================================
// Flag guard
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Flag {
    Busy,
    ActionPending,
}

/// Clears its flag on drop.
struct FlagGuard<'a> {
    state: &'a Mutex<ManagerState>,
    flag: Flag,
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        match self.flag {
            Flag::Busy => state.busy = false,
            Flag::ActionPending => state.action_pending = false,
        }
    }
}

// ============================================================================
// Manager
// ============================================================================

/// Orchestrates resolve, edit, draft and save for one session.
pub struct BlueprintManager {
    api: Arc<dyn BlueprintApi>,
    resolver: SessionResolver,
    drafts: Arc<dyn DraftStore>,
    registry: Arc<ViewRegistry>,
    limits: LayoutLimits,
    session: SessionRef,
    state: Mutex<ManagerState>,
}

impl BlueprintManager {
    pub fn new(api: Arc<dyn BlueprintApi>, drafts: Arc<dyn DraftStore>, session: SessionRef) -> Self {
        Self {
            resolver: SessionResolver::new(api.clone()),
            api,
            drafts,
            registry: Arc::new(ViewRegistry::builtin()),
            limits: LayoutLimits::default(),
            session,
            state: Mutex::new(ManagerState::new()),
        }
    }

    pub fn with_registry(mut self, registry: Arc<ViewRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_limits(mut self, limits: LayoutLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn session(&self) -> &SessionRef {
        &self.session
    }

    pub fn limits(&self) -> &LayoutLimits {
        &self.limits
    }

    // ── Gating helpers ──

    fn begin(&self, flag: Flag, op: &'static str) -> Option<FlagGuard<'_>> {
        let mut state = self.state.lock();
        if state.busy || state.action_pending {
            tracing::debug!(op, "operation in flight, skipped");
            return None;
        }
        match flag {
            Flag::Busy => state.busy = true,
            Flag::ActionPending => state.action_pending = true,
        }
        Some(FlagGuard {
            state: &self.state,
            flag,
        })
    }

    fn fail(&self, op: &'static str, err: ManagerError) -> ManagerResult<Dispatch> {
        tracing::warn!(op, session = %self.session, error = %err, "blueprint operation failed");
        self.state
            .lock()
            .notices
            .push(Notice::error(format!("{op} failed: {err}")));
        Err(err)
    }

    fn draft_key(&self, blueprint_id: &BlueprintId) -> DraftKey {
        DraftKey::new(self.session.kind, self.session.id.clone(), blueprint_id.clone())
    }

    /// Current id and name, or `NoBlueprint`.
    fn current(&self) -> ManagerResult<(BlueprintId, String, BlueprintNode)> {
        let state = self.state.lock();
        match &state.blueprint_id {
            Some(id) => Ok((id.clone(), state.name.clone(), state.tree.clone())),
            None => Err(ManagerError::NoBlueprint),
        }
    }

    /// Make `detail` current, overlaying any draft and filling defaults.
    fn apply_detail(&self, state: &mut ManagerState, detail: BlueprintDetail) {
        let draft = self.drafts.get(&self.draft_key(&detail.id));
        state.has_draft = draft.is_some();
        let tree = draft.unwrap_or(detail.tree);
        state.tree = fill_default_config(&tree, &state.topics, &self.registry);
        state.selected = ensure_valid_selection(&state.tree, Some(&state.selected));
        state.blueprint_id = Some(detail.id);
        state.name = detail.name;
    }

    // ========================================================================
    // Network operations
    // ========================================================================

    /// Resolve the session's blueprint (creating one if unbound) and load it.
    pub async fn resolve_session_blueprint(&self) -> ManagerResult<Dispatch> {
        let Some(_guard) = self.begin(Flag::Busy, "resolve") else {
            return Ok(Dispatch::Skipped);
        };
        match self.fetch_resolved().await {
            Ok((detail, listing)) => {
                tracing::info!(session = %self.session, blueprint = %detail.id, "session blueprint loaded");
                let mut state = self.state.lock();
                state.bound_blueprint_id = Some(detail.id.clone());
                state.saved_blueprints = listing;
                self.apply_detail(&mut state, detail);
                Ok(Dispatch::Completed)
            }
            Err(e) => self.fail("resolve", e),
        }
    }

    async fn fetch_resolved(&self) -> ManagerResult<(BlueprintDetail, Vec<BlueprintSummary>)> {
        let resolved = self.resolver.resolve_ref(&self.session).await?;
        let detail = self.api.get(&resolved.id).await?;
        let listing = self.api.list().await?;
        Ok((detail, listing))
    }

    /// Load a blueprint for viewing and editing. The binding is unchanged.
    pub async fn open_blueprint(&self, id: &BlueprintId) -> ManagerResult<Dispatch> {
        let Some(_guard) = self.begin(Flag::Busy, "open") else {
            return Ok(Dispatch::Skipped);
        };
        match self.api.get(id).await {
            Ok(detail) => {
                tracing::debug!(blueprint = %id, "blueprint opened");
                let mut state = self.state.lock();
                self.apply_detail(&mut state, detail);
                Ok(Dispatch::Completed)
            }
            Err(e) => self.fail("open", e.into()),
        }
    }

    /// Bind the session to `id`, then open it.
    pub async fn select_blueprint(&self, id: &BlueprintId) -> ManagerResult<Dispatch> {
        let Some(_guard) = self.begin(Flag::Busy, "select") else {
            return Ok(Dispatch::Skipped);
        };
        let fetched = async {
            self.resolver
                .bind(self.session.kind, &self.session.id, id)
                .await?;
            self.api.get(id).await
        }
        .await;
        match fetched {
            Ok(detail) => {
                let mut state = self.state.lock();
                state.bound_blueprint_id = Some(id.clone());
                self.apply_detail(&mut state, detail);
                Ok(Dispatch::Completed)
            }
            Err(e) => self.fail("select", e.into()),
        }
    }

    /// Push the current name and tree, then drop the draft.
    pub async fn save_blueprint(&self) -> ManagerResult<Dispatch> {
        let Some(_guard) = self.begin(Flag::ActionPending, "save") else {
            return Ok(Dispatch::Skipped);
        };
        let (id, sent_name, sent_tree) = match self.current() {
            Ok(current) => current,
            Err(e) => return self.fail("save", e),
        };
        let pushed = async {
            let update = UpdateBlueprint::tree(sent_tree.clone()).with_name(sent_name.clone());
            let detail = self.api.update(&id, &update).await?;
            let listing = self.api.list().await?;
            Ok::<_, ManagerError>((detail, listing))
        }
        .await;
        let (detail, listing) = match pushed {
            Ok(pushed) => pushed,
            Err(e) => return self.fail("save", e),
        };

        let mut state = self.state.lock();
        let name = detail.name.clone();
        if state.tree != sent_tree || state.name != sent_name {
            tracing::info!(blueprint = %detail.id, "edited during save, keeping local draft");
            state.saved_blueprints = listing;
            state
                .notices
                .push(Notice::info(format!("Saved \"{name}\"; newer edits kept as draft")));
            return Ok(Dispatch::Completed);
        }
        if let Err(e) = self.drafts.delete(&self.draft_key(&id)) {
            drop(state);
            return self.fail("save", e.into());
        }
        tracing::info!(blueprint = %detail.id, name = %name, "blueprint saved");
        state.saved_blueprints = listing;
        self.apply_detail(&mut state, detail);
        state.notices.push(Notice::info(format!("Saved \"{name}\"")));
        Ok(Dispatch::Completed)
    }

    /// Save the current tree as a new blueprint named `"<name> (copy)"` and
    /// switch to it. The session binding is unchanged.
    pub async fn duplicate_blueprint(&self) -> ManagerResult<Dispatch> {
        let Some(_guard) = self.begin(Flag::Busy, "duplicate") else {
            return Ok(Dispatch::Skipped);
        };
        let created = async {
            let (_, name, tree) = self.current()?;
            let detail = self.api.create(&format!("{name} (copy)"), &tree).await?;
            let listing = self.api.list().await?;
            Ok::<_, ManagerError>((detail, listing))
        }
        .await;
        match created {
            Ok((detail, listing)) => {
                tracing::info!(blueprint = %detail.id, name = %detail.name, "blueprint duplicated");
                let mut state = self.state.lock();
                state.saved_blueprints = listing;
                self.apply_detail(&mut state, detail);
                Ok(Dispatch::Completed)
            }
            Err(e) => self.fail("duplicate", e),
        }
    }

    /// Delete the current blueprint and its draft.
    ///
    /// If it was the bound blueprint the session is resolved again (creating
    /// a fresh default); otherwise the bound blueprint is reopened.
    ///
    /// Once the server delete succeeds the blueprint is forgotten locally,
    /// even if loading the next one fails.
    pub async fn delete_blueprint(&self) -> ManagerResult<Dispatch> {
        let Some(_guard) = self.begin(Flag::Busy, "delete") else {
            return Ok(Dispatch::Skipped);
        };
        let (id, _, _) = match self.current() {
            Ok(current) => current,
            Err(e) => return self.fail("delete", e),
        };
        let bound = self.state.lock().bound_blueprint_id.clone();
        if let Err(e) = self.api.delete(&id).await {
            return self.fail("delete", e.into());
        }
        self.forget(&id);

        match self.load_after_delete(&id, bound).await {
            Ok((next, listing)) => {
                tracing::info!(deleted = %id, next = %next.id, "blueprint deleted");
                let mut state = self.state.lock();
                state.bound_blueprint_id = Some(next.id.clone());
                state.saved_blueprints = listing;
                self.apply_detail(&mut state, next);
                Ok(Dispatch::Completed)
            }
            Err(e) => self.fail("delete", e),
        }
    }

    /// Drop every local reference to a blueprint the server no longer has.
    fn forget(&self, id: &BlueprintId) {
        if let Err(e) = self.drafts.delete(&self.draft_key(id)) {
            tracing::warn!(blueprint = %id, error = %e, "failed to drop draft of deleted blueprint");
        }
        let mut state = self.state.lock();
        if state.blueprint_id.as_ref() == Some(id) {
            state.blueprint_id = None;
            state.has_draft = false;
        }
        if state.bound_blueprint_id.as_ref() == Some(id) {
            state.bound_blueprint_id = None;
        }
        state.saved_blueprints.retain(|summary| &summary.id != id);
    }

    async fn load_after_delete(
        &self,
        deleted: &BlueprintId,
        bound: Option<BlueprintId>,
    ) -> ManagerResult<(BlueprintDetail, Vec<BlueprintSummary>)> {
        let next = match bound {
            Some(bound) if &bound != deleted => self.api.get(&bound).await?,
            _ => self.resolver.resolve_ref(&self.session).await?,
        };
        let listing = self.api.list().await?;
        Ok((next, listing))
    }

    /// Discard the draft and reload the saved tree.
    pub async fn reset_blueprint(&self) -> ManagerResult<Dispatch> {
        let Some(_guard) = self.begin(Flag::Busy, "reset") else {
            return Ok(Dispatch::Skipped);
        };
        let reloaded = async {
            let (id, _, _) = self.current()?;
            let detail = self.api.get(&id).await?;
            self.drafts.delete(&self.draft_key(&id))?;
            Ok::<_, ManagerError>(detail)
        }
        .await;
        match reloaded {
            Ok(detail) => {
                tracing::info!(blueprint = %detail.id, "blueprint reset to saved");
                let mut state = self.state.lock();
                self.apply_detail(&mut state, detail);
                Ok(Dispatch::Completed)
            }
            Err(e) => self.fail("reset", e),
        }
    }

    /// Reload the catalogue listing.
    pub async fn refresh_saved_blueprints(&self) -> ManagerResult<Dispatch> {
        let Some(_guard) = self.begin(Flag::Busy, "refresh") else {
            return Ok(Dispatch::Skipped);
        };
        match self.api.list().await {
            Ok(listing) => {
                self.state.lock().saved_blueprints = listing;
                Ok(Dispatch::Completed)
            }
            Err(e) => self.fail("refresh", e.into()),
        }
    }

    // ========================================================================
    // Local operations
    // ========================================================================

    /// Apply a tree edit, fix up the selection and write the draft.
    ///
    /// Returns whether the tree changed. Edits that change nothing do not
    /// create a draft.
    pub fn edit<F>(&self, f: F) -> ManagerResult<bool>
    where
        F: FnOnce(&BlueprintNode) -> BlueprintNode,
    {
        let mut state = self.state.lock();
        let next = f(&state.tree);
        if next == state.tree {
            return Ok(false);
        }
        if let Some(id) = &state.blueprint_id {
            self.drafts.set(&self.draft_key(id), &next)?;
            state.has_draft = true;
        }
        state.selected = ensure_valid_selection(&next, Some(&state.selected));
        state.tree = next;
        tracing::debug!(nodes = state.tree.node_count(), "tree edited");
        Ok(true)
    }

    /// Apply a serialized edit.
    pub fn apply_edit(&self, edit: &BlueprintEdit) -> ManagerResult<bool> {
        tracing::trace!(op = edit.name(), "applying edit");
        self.edit(|tree| edit.apply(tree, &self.limits))
    }

    /// Select a node. Unknown ids select the root. Returns the selection.
    pub fn select(&self, id: &NodeId) -> NodeId {
        let mut state = self.state.lock();
        state.selected = ensure_valid_selection(&state.tree, Some(id));
        state.selected.clone()
    }

    /// Rename the current blueprint locally; persisted on save.
    pub fn rename(&self, name: impl Into<String>) {
        self.state.lock().name = name.into();
    }

    /// Replace the live topic list and refill view defaults.
    pub fn set_topics(&self, topics: Vec<String>) {
        let mut state = self.state.lock();
        state.tree = fill_default_config(&state.tree, &topics, &self.registry);
        state.topics = topics;
    }

    pub fn snapshot(&self) -> ManagerSnapshot {
        let state = self.state.lock();
        ManagerSnapshot {
            blueprint_id: state.blueprint_id.clone(),
            name: state.name.clone(),
            tree: state.tree.clone(),
            bound_blueprint_id: state.bound_blueprint_id.clone(),
            selected: state.selected.clone(),
            has_draft: state.has_draft,
            saved_blueprints: state.saved_blueprints.clone(),
            topics: state.topics.clone(),
            busy: state.busy,
            action_pending: state.action_pending,
        }
    }

    /// Drain queued notices.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.lock().notices)
    }
}

// ============================================================================
// Tests
// ============================================================================
