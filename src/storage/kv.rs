//! Key-value port for durable client storage.
//!
//! The selection store only ever needs `read(key)` and `write(key, value)`.
//! Backends implement [`KeyValuePort`]; [`ProfileStorage`] scopes any backend
//! to one client profile so that profiles never see each other's records.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::ClientProfile;

/// Errors raised by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem failure while reading or writing `key`.
    #[error("storage i/o failed for {key}: {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Record could not be encoded.
    #[error("storage encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Minimal durable key-value interface.
///
/// Implementations must make a successful `write` visible to every later
/// `read` of the same key, including reads through a new handle over the
/// same backing store.
pub trait KeyValuePort: Send + Sync + fmt::Debug {
    /// Returns the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the value could not be persisted.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process backend. Durable only for the lifetime of the process; used in
/// tests and when no storage directory is configured.
#[derive(Debug, Default)]
pub struct MemoryKeyValue {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValue {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValuePort for MemoryKeyValue {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// View of a backend restricted to one client profile.
#[derive(Debug, Clone)]
pub struct ProfileStorage {
    inner: Arc<dyn KeyValuePort>,
    profile: ClientProfile,
}

impl ProfileStorage {
    /// Scopes `inner` to `profile`.
    #[must_use]
    pub fn new(inner: Arc<dyn KeyValuePort>, profile: ClientProfile) -> Self {
        Self { inner, profile }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}.{key}", self.profile)
    }
}

impl KeyValuePort for ProfileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.read(&self.scoped(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.write(&self.scoped(key), value)
    }
}
