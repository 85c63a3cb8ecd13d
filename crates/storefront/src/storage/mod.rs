//! Client-local key-value storage.
//!
//! Modeled on browser `localStorage`: string keys, string values, synchronous
//! access, scoped to one profile with no cross-device sync. The cart store is
//! the only writer of its key.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - In-process map, used by tests and ephemeral sessions
//! - [`FileStorage`] - One file per key under a profile directory (CLI)

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors that can occur when reading or writing client-local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The value does not fit in the storage quota.
    #[error("Quota exceeded writing {key}: {size} bytes exceeds limit of {limit}")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    /// The storage backend cannot be used (e.g., poisoned lock).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A synchronous string key-value store.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be modified.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Reject values larger than the configured quota.
fn check_quota(key: &str, value: &str, quota: Option<usize>) -> Result<(), StorageError> {
    match quota {
        Some(limit) if value.len() > limit => Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            size: value.len(),
            limit,
        }),
        _ => Ok(()),
    }
}
