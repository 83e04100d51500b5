//! Persisted bearer token. One durable string under a fixed location;
//! absence means an anonymous session. Mirrors the single client-storage
//! slot the dashboard uses, so load/save/clear never surface errors to the
//! session flow: a failed read is simply an absent token.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// File-backed token slot (JSON `{token, saved_at}`); corrupt or missing
/// files read as absent.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<StoredToken>(&raw) {
            Ok(stored) => Some(stored.token),
            Err(e) => {
                warn!(target: "neuronet", "token file {} unreadable ({}), treating as absent", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, token: &str) {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).ok();
        }
        let stored = StoredToken { token: token.to_string(), saved_at: Utc::now() };
        let body = serde_json::to_string_pretty(&stored).unwrap_or_default();
        if let Err(e) = std::fs::write(&self.path, body) {
            warn!(target: "neuronet", "failed to persist token to {}: {}", self.path.display(), e);
        }
    }

    fn clear(&self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!(target: "neuronet", "failed to clear token file {}: {}", self.path.display(), e);
            }
        }
    }
}

/// In-memory token slot for tests and embedders without durable storage.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.slot.lock().clone()
    }

    fn save(&self, token: &str) {
        *self.slot.lock() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.slot.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_store_round_trip_and_clear() {
        let tmp = tempdir().unwrap();
        let store = FileTokenStore::new(tmp.path().join("auth").join("token.json"));
        assert_eq!(store.load(), None);

        store.save("T-123");
        assert_eq!(store.load(), Some("T-123".to_string()));

        store.clear();
        assert_eq!(store.load(), None);
        // clearing twice is a no-op
        store.clear();
    }

    #[test]
    fn corrupt_file_reads_as_absent() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("token.json");
        std::fs::write(&path, "not json at all").unwrap();
        let store = FileTokenStore::new(&path);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load(), None);
        store.save("tok");
        assert_eq!(store.load(), Some("tok".to_string()));
        store.clear();
        assert_eq!(store.load(), None);
    }
}
