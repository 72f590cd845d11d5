//! Local draft overlays.
//!
//! A draft is an unsaved copy of a blueprint's tree, scoped to one session.
//! Drafts live only on this machine; saving, resetting or deleting the
//! blueprint removes them.
//!
//! Both stores keep drafts as JSON text and decode on read. A draft that
//! fails to parse or breaks a tree invariant is reported as absent and logged,
//! so a corrupt file never reaches the editor.
//!
//! File writes go to `{name}.json.tmp` first and are renamed into place.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use blueprint_types::{BlueprintId, BlueprintNode, LayoutLimits, SessionId, SessionKind, validate};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from draft storage.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("draft encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DraftResult<T> = Result<T, DraftError>;

/// Identifies one draft: a blueprint as edited under one session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftKey {
    pub session_kind: SessionKind,
    pub session_id: SessionId,
    pub blueprint_id: BlueprintId,
}

impl DraftKey {
    pub fn new(
        session_kind: SessionKind,
        session_id: impl Into<SessionId>,
        blueprint_id: impl Into<BlueprintId>,
    ) -> Self {
        Self {
            session_kind,
            session_id: session_id.into(),
            blueprint_id: blueprint_id.into(),
        }
    }

    /// `"{kind}:{session}:{blueprint}"`.
    pub fn storage_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.session_kind, self.session_id, self.blueprint_id
        )
    }

    /// Filesystem-safe file name for this key.
    ///
    /// Bytes outside `[A-Za-z0-9_-]` are percent-encoded, so distinct keys
    /// never share a file.
    pub fn file_name(&self) -> String {
        let key = self.storage_key();
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => name.push(byte as char),
                other => name.push_str(&format!("%{other:02X}")),
            }
        }
        name.push_str(".json");
        name
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// Key-value store for drafts.
///
/// `get` never fails: unreadable or invalid drafts are treated as absent.
/// `set` and `delete` report storage failures; deleting a missing draft is Ok.
pub trait DraftStore: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    fn get(&self, key: &DraftKey) -> Option<BlueprintNode>;

    fn set(&self, key: &DraftKey, tree: &BlueprintNode) -> DraftResult<()>;

    fn delete(&self, key: &DraftKey) -> DraftResult<()>;

    /// Whether a usable draft exists for `key`.
    fn contains(&self, key: &DraftKey) -> bool {
        self.get(key).is_some()
    }
}

/// Parse and check a stored draft, logging why it was dropped.
fn decode_draft(
    store: &str,
    key: &DraftKey,
    raw: &str,
    limits: &LayoutLimits,
) -> Option<BlueprintNode> {
    let tree: BlueprintNode = match serde_json::from_str(raw) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::warn!(store, key = %key, error = %e, "discarding unparseable draft");
            return None;
        }
    };
    if let Err(e) = validate(&tree, limits) {
        tracing::warn!(store, key = %key, error = %e, "discarding malformed draft");
        return None;
    }
    Some(tree)
}

// ============================================================================
// Memory store
// ============================================================================

/// In-process draft store. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryDraftStore {
    entries: RwLock<HashMap<String, String>>,
    limits: LayoutLimits,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: LayoutLimits) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            limits,
        }
    }

    /// Store raw text under a key, bypassing encoding.
    pub fn insert_raw(&self, key: &DraftKey, raw: impl Into<String>) {
        self.entries.write().insert(key.storage_key(), raw.into());
    }

    /// Number of stored drafts, including ones that would fail to decode.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl DraftStore for MemoryDraftStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &DraftKey) -> Option<BlueprintNode> {
        let raw = self.entries.read().get(&key.storage_key()).cloned()?;
        decode_draft(self.name(), key, &raw, &self.limits)
    }

    fn set(&self, key: &DraftKey, tree: &BlueprintNode) -> DraftResult<()> {
        let raw = serde_json::to_string(tree)?;
        self.entries.write().insert(key.storage_key(), raw);
        tracing::debug!(store = "memory", key = %key, "draft saved");
        Ok(())
    }

    fn delete(&self, key: &DraftKey) -> DraftResult<()> {
        if self.entries.write().remove(&key.storage_key()).is_some() {
            tracing::debug!(store = "memory", key = %key, "draft deleted");
        }
        Ok(())
    }
}

impl fmt::Debug for MemoryDraftStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDraftStore")
            .field("entries", &self.len())
            .finish()
    }
}

// ============================================================================
// File store
// ============================================================================

/// One JSON file per draft under a directory.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    dir: PathBuf,
    limits: LayoutLimits,
}

impl FileDraftStore {
    /// Store drafts under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            limits: LayoutLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: LayoutLimits) -> Self {
        self.limits = limits;
        self
    }

    /// `{data_local_dir}/blueprint/drafts`, if the platform has one.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("blueprint").join("drafts"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &DraftKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl DraftStore for FileDraftStore {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &DraftKey) -> Option<BlueprintNode> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read draft");
                return None;
            }
        };
        decode_draft(self.name(), key, &raw, &self.limits)
    }

    fn set(&self, key: &DraftKey, tree: &BlueprintNode) -> DraftResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        {
            let mut file = fs::File::create(&tmp)?;
            serde_json::to_writer(&mut file, tree)?;
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;

        tracing::debug!(path = %path.display(), key = %key, "draft saved");
        Ok(())
    }

    fn delete(&self, key: &DraftKey) -> DraftResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), key = %key, "draft deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_types::{SplitDirection, SplitNode, ViewNode, create_default_blueprint};

    fn key() -> DraftKey {
        DraftKey::new(SessionKind::Teleop, "run/7", "bp-1")
    }

    fn sample_tree() -> BlueprintNode {
        SplitNode::new(
            SplitDirection::Row,
            ViewNode::new("camera").into(),
            ViewNode::new("plot").into(),
        )
        .into()
    }

    #[test]
    fn test_key_rendering() {
        let key = key();
        assert_eq!(key.storage_key(), "teleop:run/7:bp-1");
        assert_eq!(key.file_name(), "teleop%3Arun%2F7%3Abp-1.json");
        assert_eq!(key.to_string(), "teleop:run/7:bp-1");
    }

    #[test]
    fn test_memory_roundtrip() {
        let store = MemoryDraftStore::new();
        let key = key();
        assert!(store.get(&key).is_none());

        let tree = sample_tree();
        store.set(&key, &tree).unwrap();
        assert_eq!(store.get(&key), Some(tree));
        assert!(store.contains(&key));

        store.delete(&key).unwrap();
        assert!(store.get(&key).is_none());
        // Deleting again is fine.
        store.delete(&key).unwrap();
    }

    #[test]
    fn test_keys_are_isolated() {
        let store = MemoryDraftStore::new();
        let a = DraftKey::new(SessionKind::Recording, "s1", "bp-1");
        let b = DraftKey::new(SessionKind::Teleop, "s1", "bp-1");
        store.set(&a, &sample_tree()).unwrap();
        assert!(store.get(&b).is_none());
    }

    #[test]
    fn test_corrupt_memory_draft_is_absent() {
        let store = MemoryDraftStore::new();
        let key = key();
        store.insert_raw(&key, "{not json");
        assert!(store.get(&key).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalid_tree_draft_is_absent() {
        let store = MemoryDraftStore::new();
        let key = key();
        let raw = r#"{
            "type": "tabs",
            "id": "t",
            "activeId": "missing",
            "tabs": [{"id": "a", "title": "A", "child": {"type": "view", "id": "v", "viewType": "x"}}]
        }"#;
        store.insert_raw(&key, raw);
        assert!(store.get(&key).is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().join("drafts"));
        let key = key();
        assert!(store.get(&key).is_none());

        let tree = create_default_blueprint();
        store.set(&key, &tree).unwrap();
        assert_eq!(store.get(&key), Some(tree.clone()));

        let path = store.dir().join(key.file_name());
        assert!(path.exists());
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        assert!(!PathBuf::from(tmp).exists());

        // Overwrite.
        let next = sample_tree();
        store.set(&key, &next).unwrap();
        assert_eq!(store.get(&key), Some(next));

        store.delete(&key).unwrap();
        assert!(!path.exists());
        store.delete(&key).unwrap();
    }

    #[test]
    fn test_file_store_discards_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());
        let key = key();
        fs::write(dir.path().join(key.file_name()), b"[1, 2").unwrap();
        assert!(store.get(&key).is_none());
    }
}
