//! Persistence hook for session state.
//!
//! The session store doesn't decide WHERE a session lives. It talks to a
//! [`Storage`]: a tiny string key/value interface, the same shape as a
//! browser's local storage. Two backends ship here:
//!
//! - [`MemoryStorage`]: lives as long as the process; tests and one-shot
//!   tools.
//! - [`FileStorage`]: one JSON object on disk; survives restarts, which is
//!   what lets a CLI stay signed in between invocations.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::NamedTempFile;

use crate::SessionError;

/// A string key/value store the session is persisted into.
///
/// # Trait bounds
///
/// - `Send + Sync` → one store is shared (behind `Arc`) by the router
///   guard and the API gateway, which may run on different Tokio threads.
/// - `'static` → the storage lives as long as the session store.
///
/// Methods are synchronous: every backend here is local and small.
///
/// # Example
///
/// ```rust
/// use household_session::{MemoryStorage, Storage};
///
/// let storage = MemoryStorage::new();
/// storage.set("token", "abc").unwrap();
/// assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc"));
/// storage.remove("token").unwrap();
/// assert_eq!(storage.get("token").unwrap(), None);
/// ```
pub trait Storage: Send + Sync + 'static {
    /// Returns the value for `key`, or `None` if it was never set.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Sets `key` to `value`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-process storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic mid-insert can't leave a HashMap of strings in a state
        // worth refusing to read.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.entries().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// Storage backed by a single JSON object file, e.g.
/// `{"token": "eyJ...", "user": "{\"role\":\"admin\"}"}`.
///
/// Every write rewrites the file through a temporary sibling and a rename,
/// so a crash mid-write leaves either the old or the new contents. The file
/// holds a bearer token, so on Unix it is readable by its owner only. A
/// missing file reads as empty.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Uses `path` as the backing file. Nothing is touched until the first
    /// read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(SessionError::Corrupt),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(SessionError::Storage(e)),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };
        let bytes = serde_json::to_vec_pretty(entries).map_err(SessionError::Corrupt)?;

        // NamedTempFile is created owner-only (0600 on Unix); the rename
        // carries that mode over to the session file.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), SessionError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        if apply(&mut entries) {
            self.save(&entries)?;
        }
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    /// A fresh temp dir and a session file path inside it. The dir is
    /// deleted when the returned guard drops.
    fn temp_path() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");
        (dir, path)
    }

    // =====================================================================
    // MemoryStorage
    // =====================================================================

    #[test]
    fn test_memory_storage_get_missing_returns_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_set_overwrites() {
        let storage = MemoryStorage::new();
        storage.set("token", "a").unwrap();
        storage.set("token", "b").unwrap();

        assert_eq!(storage.get("token").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_memory_storage_remove_missing_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove("nothing").is_ok());
    }

    // =====================================================================
    // FileStorage
    // =====================================================================

    #[test]
    fn test_file_storage_missing_file_reads_empty() {
        let (_dir, path) = temp_path();
        let storage = FileStorage::new(path);
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[test]
    fn test_file_storage_values_survive_new_instance() {
        let (_dir, path) = temp_path();

        FileStorage::new(&path).set("token", "t1").unwrap();
        let reopened = FileStorage::new(&path);

        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("t1"));
    }

    #[test]
    fn test_file_storage_remove_keeps_other_keys() {
        let (_dir, path) = temp_path();
        let storage = FileStorage::new(&path);
        storage.set("token", "t1").unwrap();
        storage.set("user", r#"{"role":"admin"}"#).unwrap();

        storage.remove("token").unwrap();

        assert_eq!(storage.get("token").unwrap(), None);
        assert_eq!(
            storage.get("user").unwrap().as_deref(),
            Some(r#"{"role":"admin"}"#)
        );
    }

    #[test]
    fn test_file_storage_corrupt_file_returns_corrupt_error() {
        let (_dir, path) = temp_path();
        fs::write(&path, b"not json").unwrap();

        let result = FileStorage::new(&path).get("token");

        assert!(matches!(result, Err(SessionError::Corrupt(_))));
    }

    #[test]
    fn test_file_storage_nested_dir_is_created() {
        let (dir, _) = temp_path();
        let path = dir.path().join("a").join("b").join("session.json");

        FileStorage::new(&path).set("token", "t1").unwrap();

        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, path) = temp_path();
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        FileStorage::new(&path).set("token", "secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "mode was {mode:o}");
    }
}
