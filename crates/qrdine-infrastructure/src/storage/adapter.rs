//! Persistence adapter.
//!
//! Wraps the per-tab and durable stores behind an API that never fails:
//! storage errors are logged and turned into "nothing stored" / "write
//! skipped". Callers above this layer never see a storage error.

use super::{MemoryStore, UnavailableStore};
use qrdine_core::session::{KeyValueStore, StorageScope};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[derive(Clone)]
pub struct StorageAdapter {
    session: Arc<dyn KeyValueStore>,
    durable: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageAdapter")
            .field("session", &"<dyn KeyValueStore>")
            .field("durable", &"<dyn KeyValueStore>")
            .finish()
    }
}

impl StorageAdapter {
    pub fn new(session: Arc<dyn KeyValueStore>, durable: Arc<dyn KeyValueStore>) -> Self {
        Self { session, durable }
    }

    /// Both scopes backed by fresh in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// Both scopes unavailable; every read is empty, every write a no-op.
    pub fn unavailable() -> Self {
        Self::new(
            Arc::new(UnavailableStore::default()),
            Arc::new(UnavailableStore::default()),
        )
    }

    fn store(&self, scope: StorageScope) -> &dyn KeyValueStore {
        match scope {
            StorageScope::Session => self.session.as_ref(),
            StorageScope::Durable => self.durable.as_ref(),
        }
    }

    pub fn get(&self, scope: StorageScope, key: &str) -> Option<String> {
        match self.store(scope).get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(scope = scope.name(), key, error = %e, "Storage read failed");
                None
            }
        }
    }

    /// Returns `true` if the value was stored.
    pub fn set(&self, scope: StorageScope, key: &str, value: &str) -> bool {
        match self.store(scope).set(key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(scope = scope.name(), key, error = %e, "Storage write failed");
                false
            }
        }
    }

    /// Returns `true` if the key is gone afterwards.
    pub fn remove(&self, scope: StorageScope, key: &str) -> bool {
        match self.store(scope).remove(key) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(scope = scope.name(), key, error = %e, "Storage remove failed");
                false
            }
        }
    }

    /// Keys in `scope`, sorted.
    pub fn keys(&self, scope: StorageScope) -> Vec<String> {
        match self.store(scope).keys() {
            Ok(mut keys) => {
                keys.sort();
                keys
            }
            Err(e) => {
                tracing::warn!(scope = scope.name(), error = %e, "Storage key listing failed");
                Vec::new()
            }
        }
    }

    pub fn get_json<T: DeserializeOwned>(&self, scope: StorageScope, key: &str) -> Option<T> {
        let raw = self.get(scope, key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(scope = scope.name(), key, error = %e, "Stored value is not valid JSON");
                None
            }
        }
    }

    pub fn set_json<T: Serialize>(&self, scope: StorageScope, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(scope, key, &raw),
            Err(e) => {
                tracing::warn!(scope = scope.name(), key, error = %e, "Failed to serialize value");
                false
            }
        }
    }

    /// Reads a bare identifier, accepting both `abc` and `"abc"`.
    ///
    /// Blank values count as absent.
    pub fn get_id(&self, scope: StorageScope, key: &str) -> Option<String> {
        let raw = self.get(scope, key)?;
        let id = serde_json::from_str::<String>(&raw).unwrap_or(raw);
        let id = id.trim();
        (!id.is_empty()).then(|| id.to_string())
    }
}
