//! Durable key-value store backed by a single JSON object file.
//!
//! Every call re-reads the file so separate handles (or processes) pointing at
//! the same path observe each other's writes. Writes take the file lock, then
//! read-modify-write atomically.

use super::atomic_file::{FileLock, read_optional, write_atomic};
use qrdine_core::error::Result;
use qrdine_core::session::KeyValueStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match read_optional(&self.path)? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(BTreeMap::new()),
        }
    }

    fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut entries = self.load()?;
        if f(&mut entries) {
            write_atomic(&self.path, &serde_json::to_string_pretty(&entries)?)?;
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.load()?.into_keys().collect())
    }
}
