//! Key-value storage backends.
//!
//! The data layer only ever needs whole-value semantics: read a key, write a
//! key, remove a batch of keys. There is no atomicity across keys, so callers
//! that touch two keys in one operation accept that a failure in between
//! leaves them out of step.

use crate::config;
use crate::error::{HawkinsError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// KeyValueStorage
// ---------------------------------------------------------------------------

/// Opaque async-style key-value substrate, modelled synchronously.
///
/// Implementations must be `Send` so the client can be moved onto a blocking
/// thread by the async facade.
pub trait KeyValueStorage: Send {
    /// Returns the stored bytes, or `Ok(None)` if the key has no value.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Removes every listed key. Missing keys are not an error.
    fn remove_many(&self, keys: &[&str]) -> Result<()>;

    /// Short human-readable description, used by `Display` on the client.
    fn describe(&self) -> String {
        "custom".to_string()
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        (**self).remove_many(keys)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// Stores each key as `<data_dir>/<key>.json`.
///
/// Writes go to a temp file in the same directory and are renamed into place,
/// so an interrupted write never leaves a truncated value behind.
pub struct FileStorage {
    /// Directory holding one file per key.
    pub data_dir: PathBuf,
}

impl FileStorage {
    /// Create a file-backed store.
    ///
    /// If `data_dir` is `None`, uses the platform-appropriate data directory.
    /// Creates the directory if it does not exist.
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir.unwrap_or_else(config::default_data_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { data_dir: dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(HawkinsError::InvalidArgument(format!(
                "Storage key '{}' is not a valid file name",
                key
            )));
        }
        Ok(self
            .data_dir
            .join(format!("{}.{}", key, config::STORAGE_FILE_EXTENSION)))
    }

    /// Remove every stored value and recreate the directory.
    pub fn clear(&self) -> Result<()> {
        if self.data_dir.exists() {
            fs::remove_dir_all(&self.data_dir)?;
        }
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.data_dir)?;
        let mut tmp = NamedTempFile::new_in(&self.data_dir)?;
        tmp.write_all(value)?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| HawkinsError::Io(e.error))?;
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            let path = self.path_for(key)?;
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.data_dir.display())
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-process store. Clones share the same entries, so a test can keep a
/// handle and inspect what the client wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| HawkinsError::Storage("memory storage lock poisoned".into()))
    }

    /// Currently stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = match self.lock() {
            Ok(entries) => entries.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut entries = self.lock()?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
