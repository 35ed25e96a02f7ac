use std::sync::{Arc, Mutex};

use super::{Database, Snapshot};
use crate::gateway::SnapshotStore;

/// Key of the session record.
pub const SNAPSHOT_KEY: &str = "pomodoro.state.v1";

/// Snapshot store on top of the SQLite kv table.
///
/// Every failure is logged and swallowed: a lost snapshot only costs the
/// user their in-progress session.
pub struct SqliteSnapshotStore {
    db: Database,
}

impl SqliteSnapshotStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self) -> Option<Snapshot> {
        match self.db.kv_get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => Snapshot::from_json(&raw),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("failed to read session snapshot: {e}");
                None
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) {
        let raw = match serde_json::to_string(snapshot) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("failed to encode session snapshot: {e}");
                return;
            }
        };
        if let Err(e) = self.db.kv_set(SNAPSHOT_KEY, &raw) {
            tracing::warn!("failed to write session snapshot: {e}");
        }
    }

    fn clear(&self) {
        if let Err(e) = self.db.kv_delete(SNAPSHOT_KEY) {
            tracing::warn!("failed to clear session snapshot: {e}");
        }
    }
}

/// In-process store holding the raw JSON text. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    raw: Arc<Mutex<Option<String>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with arbitrary text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let store = Self::default();
        store.set_raw(Some(raw.into()));
        store
    }

    pub fn raw(&self) -> Option<String> {
        self.raw
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_raw(&self, value: Option<String>) {
        *self
            .raw
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = value;
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Option<Snapshot> {
        self.raw().as_deref().and_then(Snapshot::from_json)
    }

    fn save(&self, snapshot: &Snapshot) {
        match serde_json::to_string(snapshot) {
            Ok(raw) => self.set_raw(Some(raw)),
            Err(e) => tracing::warn!("failed to encode session snapshot: {e}"),
        }
    }

    fn clear(&self) {
        self.set_raw(None);
    }
}
