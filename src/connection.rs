//! Typed JSON access over a [`KeyValueStorage`] backend.
//!
//! Every value is a whole serialized blob. Reads here are strict: missing keys
//! are `Ok(None)`, while I/O and decode failures come back as `Err`. The query
//! layer decides which of those failures to swallow.

use crate::error::Result;
use crate::storage::KeyValueStorage;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Wraps the storage backend and serializes values as JSON.
pub struct Connection {
    storage: Box<dyn KeyValueStorage>,
}

impl Connection {
    /// Create a connection over a boxed backend.
    pub fn from_boxed(storage: Box<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read and decode the value stored under `key`.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.storage.get(key)? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Encode `value` and replace whatever is stored under `key`.
    pub fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        debug!(key, bytes = bytes.len(), "writing blob");
        self.storage.set(key, &bytes)
    }

    /// Whether `key` currently holds a non-empty value.
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self
            .storage
            .get(key)?
            .map(|bytes| !bytes.is_empty())
            .unwrap_or(false))
    }

    /// Remove the listed keys in a single backend call.
    pub fn remove_keys(&self, keys: &[&str]) -> Result<()> {
        debug!(?keys, "removing keys");
        self.storage.remove_many(keys)
    }

    /// Return the underlying backend for raw access.
    pub fn storage(&self) -> &dyn KeyValueStorage {
        self.storage.as_ref()
    }
}
