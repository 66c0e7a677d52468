//! Atomic file writes with an exclusive lock.
//!
//! Shared by the durable JSON store and the config loader:
//! - **Atomicity**: writes go to a sibling temp file, then rename
//! - **Isolation**: a `.lock` file held with `fs2` serialises writers
//! - **Durability**: explicit fsync before rename

use qrdine_core::error::{Result, SessionError};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// Reads `path`, returning `None` if it doesn't exist or is blank.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(content))
}

/// Replaces the contents of `path` with `contents` atomically.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path)?;
    let mut tmp_file = File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
    drop(tmp_file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf> {
    let parent = path
        .parent()
        .ok_or_else(|| SessionError::io(format!("Path has no parent directory: {:?}", path)))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| SessionError::io(format!("Path has no file name: {:?}", path)))?;

    Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
}

/// A file lock guard that releases the lock when dropped.
pub struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    /// Acquires an exclusive lock next to `path` (`<path>.lock`).
    pub fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| SessionError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock happens when the handle closes; the file itself is best effort.
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("store.json");

        write_atomic(&path, "{\"a\":\"1\"}").unwrap();

        assert_eq!(read_optional(&path).unwrap().as_deref(), Some("{\"a\":\"1\"}"));
        assert!(!temp_dir.path().join("nested").join(".store.json.tmp").exists());
    }

    #[test]
    fn test_read_missing_and_blank() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");
        assert!(read_optional(&path).unwrap().is_none());

        fs::write(&path, "   \n").unwrap();
        assert!(read_optional(&path).unwrap().is_none());
    }

    #[test]
    fn test_lock_file_removed_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        {
            let _lock = FileLock::acquire(&path).unwrap();
            assert!(temp_dir.path().join("store.lock").exists());
        }
        assert!(!temp_dir.path().join("store.lock").exists());
    }
}
