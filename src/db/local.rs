// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key/value storage for serialized payloads.
//!
//! Each key is one JSON file under the data directory. Writes go to a
//! temporary sibling and are renamed into place, so readers only ever see a
//! complete payload.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Local key/value storage.
#[derive(Clone)]
pub struct LocalStorage {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Files(PathBuf),
    Memory(Arc<Mutex<HashMap<String, String>>>),
}

impl LocalStorage {
    /// Open file-backed storage rooted at `dir`, creating it if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        tracing::info!(path = %dir.display(), "Opened local storage");
        Ok(Self {
            backend: Backend::Files(dir),
        })
    }

    /// Create an in-memory storage for testing (offline mode).
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(HashMap::new()))),
        }
    }

    /// Read the payload stored under `key`.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match &self.backend {
            Backend::Files(dir) => {
                let path = key_path(dir, key)?;
                match fs::read_to_string(&path) {
                    Ok(value) => Ok(Some(value)),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(StorageError::io(&path, e)),
                }
            }
            Backend::Memory(map) => Ok(lock(map)?.get(key).cloned()),
        }
    }

    /// Replace the payload stored under `key`.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match &self.backend {
            Backend::Files(dir) => {
                let path = key_path(dir, key)?;
                let tmp = path.with_extension("json.tmp");
                fs::write(&tmp, value).map_err(|e| StorageError::io(&tmp, e))?;
                fs::rename(&tmp, &path).map_err(|e| StorageError::io(&path, e))?;
                tracing::debug!(key, bytes = value.len(), "Wrote storage item");
                Ok(())
            }
            Backend::Memory(map) => {
                lock(map)?.insert(key.to_string(), value.to_string());
                Ok(())
            }
        }
    }
}

fn key_path(dir: &Path, key: &str) -> Result<PathBuf, StorageError> {
    // Keys are fixed identifiers; never let one escape the data directory.
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(dir.join(format!("{}.json", key)))
}

fn lock(
    map: &Mutex<HashMap<String, String>>,
) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
    map.lock().map_err(|_| StorageError::Poisoned)
}

/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("In-memory storage lock poisoned")]
    Poisoned,
}

impl StorageError {
    fn io(path: &Path, err: io::Error) -> Self {
        StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_round_trip() {
        let storage = LocalStorage::new_mock();
        assert_eq!(storage.get_item("hiking_records").unwrap(), None);

        storage.set_item("hiking_records", "[]").unwrap();
        assert_eq!(
            storage.get_item("hiking_records").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_mock_clones_share_data() {
        let storage = LocalStorage::new_mock();
        let clone = storage.clone();
        storage.set_item("k", "v").unwrap();
        assert_eq!(clone.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_backend_overwrites_fully() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::open(dir.path().join("nested")).unwrap();

        storage.set_item("hiking_records", "[1,2,3]").unwrap();
        storage.set_item("hiking_records", "[]").unwrap();

        assert_eq!(
            storage.get_item("hiking_records").unwrap().as_deref(),
            Some("[]")
        );
        assert!(dir.path().join("nested/hiking_records.json").exists());
        assert!(!dir.path().join("nested/hiking_records.json.tmp").exists());
    }

    #[test]
    fn test_file_backend_missing_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        assert_eq!(storage.get_item("absent").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        assert!(matches!(
            storage.set_item("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.get_item(""),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
