//! Composition root.
//!
//! Builds a ready-to-use `SessionManager` from a config file. The session
//! scope is process-local memory; the durable scope is a JSON file so order
//! history and per-table ids survive restarts.

use crate::session::SessionManager;
use anyhow::{Context, Result};
use qrdine_core::clock::{Clock, SystemClock};
use qrdine_core::config::SessionConfig;
use qrdine_infrastructure::config_service::{default_config_path, default_durable_store_path, load_config};
use qrdine_infrastructure::{
    HttpTableSessionApi, JsonFileStore, MemoryStore, StorageAdapter, UnifiedSessionStore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct SessionContext {
    pub config: SessionConfig,
    pub manager: Arc<SessionManager>,
    pub api: Arc<HttpTableSessionApi>,
}

impl SessionContext {
    /// Loads config from the platform default location and stores durable
    /// data under the platform data directory.
    pub fn from_default_paths() -> Result<Self> {
        let config_path = default_config_path().context("Failed to resolve config path")?;
        let store_path =
            default_durable_store_path().context("Failed to resolve durable store path")?;
        Self::from_paths(&config_path, store_path)
    }

    pub fn from_paths(config_path: &Path, durable_store_path: PathBuf) -> Result<Self> {
        let config = load_config(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
        Self::build(config, durable_store_path, Arc::new(SystemClock))
    }

    /// Wires every layer for an already-loaded config.
    pub fn build(
        config: SessionConfig,
        durable_store_path: PathBuf,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let adapter = Arc::new(StorageAdapter::new(
            Arc::new(MemoryStore::new()),
            Arc::new(JsonFileStore::new(durable_store_path)),
        ));
        let store = Arc::new(UnifiedSessionStore::new(adapter, clock, &config));
        let api = HttpTableSessionApi::new(&config.api).context("Failed to build session API client")?;

        tracing::debug!(
            base_url = %config.api.base_url,
            duration_minutes = config.session_duration_minutes,
            "Session context ready"
        );

        Ok(Self {
            config,
            manager: Arc::new(SessionManager::new(store)),
            api: Arc::new(api),
        })
    }

    /// Extends the current table session through the configured backend.
    pub async fn extend_session(&self) -> qrdine_core::Result<i64> {
        self.manager.extend_session(self.api.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::NewSession;
    use qrdine_core::clock::ManualClock;
    use qrdine_core::keys::ORDER_HISTORY_KEY;
    use qrdine_core::session::StorageScope;
    use tempfile::TempDir;

    #[test]
    fn test_from_paths_writes_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let context =
            SessionContext::from_paths(&config_path, temp_dir.path().join("storage.json")).unwrap();

        assert!(config_path.exists());
        assert_eq!(context.config.session_duration_minutes, 120);
        assert!(context.manager.get_session().is_none());
    }

    #[test]
    fn test_durable_scope_is_file_backed() {
        let temp_dir = TempDir::new().unwrap();
        let store_path = temp_dir.path().join("storage.json");
        let context = SessionContext::build(
            SessionConfig::default(),
            store_path.clone(),
            Arc::new(ManualClock::new(1_000)),
        )
        .unwrap();

        assert!(context.manager.create_session(NewSession {
            guest_session_id: "g1".into(),
            restaurant_id: "r1".into(),
            table_id: "t1".into(),
            ..NewSession::default()
        }));
        context
            .manager
            .store()
            .adapter()
            .set(StorageScope::Durable, ORDER_HISTORY_KEY, "[]");

        let on_disk = std::fs::read_to_string(&store_path).unwrap();
        assert!(on_disk.contains(ORDER_HISTORY_KEY));
        // The session record lives in the per-process scope.
        assert!(!on_disk.contains("qrdine_session"));
    }
}
