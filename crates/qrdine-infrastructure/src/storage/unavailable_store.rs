use qrdine_core::error::{Result, SessionError};
use qrdine_core::session::KeyValueStore;

/// Store for contexts with no storage at all (server-side rendering,
/// storage disabled by the user). Every call fails.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableStore {
    fn default() -> Self {
        Self::new("no storage in this execution context")
    }
}

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(SessionError::unavailable(self.reason.clone()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(SessionError::unavailable(self.reason.clone()))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(SessionError::unavailable(self.reason.clone()))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Err(SessionError::unavailable(self.reason.clone()))
    }
}
