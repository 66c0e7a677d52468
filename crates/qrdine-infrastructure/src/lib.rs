pub mod config_service;
pub mod dto;
pub mod http_table_session_api;
pub mod migration;
pub mod session_cache;
pub mod session_store;
pub mod storage;

pub use crate::http_table_session_api::HttpTableSessionApi;
pub use crate::migration::{LegacyKeyReader, MigrationSource};
pub use crate::session_cache::SessionCache;
pub use crate::session_store::UnifiedSessionStore;
pub use crate::storage::{JsonFileStore, MemoryStore, StorageAdapter, UnavailableStore};
