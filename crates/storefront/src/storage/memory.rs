//! In-process storage backend.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{KeyValueStorage, StorageError, check_quota};

/// Key-value storage held in memory.
///
/// Counts successful writes so callers can observe how often the cart
/// actually hit storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    /// Create an empty, unlimited storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage that rejects values larger than `limit` bytes.
    #[must_use]
    pub fn with_quota(limit: usize) -> Self {
        Self {
            quota: Some(limit),
            ..Self::default()
        }
    }

    /// Seed an entry without counting it as a write.
    #[must_use]
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), value.into());
        }
        self
    }

    /// Number of successful `set_item` calls.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Unavailable("Lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_quota(key, value, self.quota)?;

        self.entries
            .write()
            .map_err(|_| StorageError::Unavailable("Lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|_| StorageError::Unavailable("Lock poisoned".to_string()))?
            .remove(key);
        Ok(())
    }
}
