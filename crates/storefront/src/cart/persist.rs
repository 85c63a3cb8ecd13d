//! Cart persistence: payload codec and the debounced write timer.
//!
//! The persisted value is a JSON array of line items stored under a single
//! key. Anything else (missing key, unreadable storage, invalid JSON, a
//! non-array payload) restores as an empty cart.

use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tokio::task::JoinHandle;

use gbones_core::LineItem;

use crate::storage::{KeyValueStorage, StorageError};

/// Why a persisted cart could not be restored.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// Storage could not be read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Payload is not valid JSON or not a list of line items.
    #[error("Malformed cart payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload is valid JSON but not an array.
    #[error("Cart payload is not an array")]
    NotAnArray,
}

/// Why the cart could not be written to storage.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Storage rejected the write.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Items could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Read the persisted line items under `key`.
///
/// # Errors
///
/// Returns `RestoreError` if storage fails or the payload is not an array of
/// line items. A missing or blank entry is an empty cart, not an error.
pub fn load_items(storage: &dyn KeyValueStorage, key: &str) -> Result<Vec<LineItem>, RestoreError> {
    let Some(raw) = storage.get_item(key)? else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: serde_json::Value = serde_json::from_str(&raw)?;
    if !value.is_array() {
        return Err(RestoreError::NotAnArray);
    }
    Ok(serde_json::from_value(value)?)
}

/// Serialize the whole collection and write it under `key`.
///
/// # Errors
///
/// Returns `PersistError` if serialization or the storage write fails.
pub fn save_items(
    storage: &dyn KeyValueStorage,
    key: &str,
    items: &[LineItem],
) -> Result<(), PersistError> {
    let payload = serde_json::to_string(items)?;
    storage.set_item(key, &payload)?;
    Ok(())
}

/// The single pending debounced write, if any.
///
/// Scheduling a new write aborts the previous one. The timer task performs no
/// await between reading cart state and writing it, so an abort either
/// prevents the write entirely or lands after it completed.
#[derive(Debug, Default)]
pub(crate) struct PendingWrite {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PendingWrite {
    /// Install `handle` as the pending write, aborting any previous one.
    pub(crate) fn replace(&self, handle: JoinHandle<()>) {
        let previous = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Abort the pending write. Returns `true` if one had not fired yet.
    pub(crate) fn cancel(&self) -> bool {
        let pending = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        pending.is_some_and(|handle| {
            let was_pending = !handle.is_finished();
            handle.abort();
            was_pending
        })
    }

    /// Whether a write is scheduled and has not fired yet.
    pub(crate) fn is_pending(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
