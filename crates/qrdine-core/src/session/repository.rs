//! Key-value storage trait.
//!
//! Defines the interface the persistence adapter wraps. Implementations are
//! allowed to fail; the adapter is what turns failures into "nothing stored".

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Which browser-style store a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageScope {
    /// Per-tab, cleared when the tab closes.
    Session,
    /// Shared across tabs, survives restarts.
    Durable,
}

impl StorageScope {
    pub fn all() -> [StorageScope; 2] {
        [StorageScope::Session, StorageScope::Durable]
    }

    pub fn name(&self) -> &'static str {
        match self {
            StorageScope::Session => "session",
            StorageScope::Durable => "durable",
        }
    }
}

/// A string-to-string store.
///
/// # Implementation Notes
///
/// - `get` on a missing key returns `Ok(None)`, not an error.
/// - `remove` on a missing key succeeds.
/// - Errors are reserved for the store itself being unusable (disabled,
///   full, IO failure).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Lists every key currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>>;
}
