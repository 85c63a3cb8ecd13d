//! Client-side cart store.
//!
//! # Architecture
//!
//! - One explicitly constructed [`CartStore`] per session, injected through
//!   [`AppState`](crate::state::AppState); clones share the same cart
//! - Mutations are synchronous and applied in call order under one lock
//! - Totals are derived from the item collection on every read
//! - Changes are written back to [`KeyValueStorage`] after a quiescence
//!   window; a burst of mutations produces one write of the latest state
//! - Writes are gated on the [`CartPhase::Ready`] lifecycle phase
//! - Restore and write failures are logged and never reach the caller
//!
//! # Example
//!
//! ```rust,ignore
//! use gbones_core::ItemCandidate;
//! use gbones_storefront::cart::CartStore;
//!
//! let cart = CartStore::open(storage, config.cart.clone());
//!
//! let id = cart.add_item(ItemCandidate::new("tee", "Tee", 1000, "EUR"), 2, None);
//! cart.update_qty(&id, 5);
//! assert_eq!(cart.subtotal_cents(), 5000);
//! ```

mod lifecycle;
mod persist;
mod state;

pub use lifecycle::CartPhase;
pub use persist::{PersistError, RestoreError, load_items, save_items};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use gbones_core::{ItemCandidate, LineItem, LineItemId};

use crate::config::CartConfig;
use crate::error::add_breadcrumb;
use crate::storage::KeyValueStorage;

use persist::PendingWrite;
use state::CartState;

/// Snapshot of the cart as presentation code renders it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub items: Vec<LineItem>,
    pub subtotal_cents: u64,
    pub item_count: u64,
    pub is_open: bool,
}

impl CartSummary {
    fn derive(state: &CartState) -> Self {
        Self {
            items: state.items().to_vec(),
            subtotal_cents: state.subtotal_cents(),
            item_count: state.item_count(),
            is_open: state.is_open(),
        }
    }
}

/// The session's cart.
///
/// Cheaply cloneable; all clones share one cart. Dropping the last clone
/// cancels any pending write.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    config: CartConfig,
    storage: Arc<dyn KeyValueStorage>,
    state: Mutex<CartState>,
    /// Serializes writes so a later write always reads later state.
    write_lock: Mutex<()>,
    pending: PendingWrite,
    changes: watch::Sender<CartSummary>,
}

impl CartStore {
    /// Create an uninitialized store. Call [`restore`](Self::restore) before
    /// expecting changes to be persisted.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, config: CartConfig) -> Self {
        let (changes, _) = watch::channel(CartSummary::default());
        Self {
            inner: Arc::new(CartStoreInner {
                config,
                storage,
                state: Mutex::new(CartState::default()),
                write_lock: Mutex::new(()),
                pending: PendingWrite::default(),
                changes,
            }),
        }
    }

    /// Create a store and restore it from storage.
    #[must_use]
    pub fn open(storage: Arc<dyn KeyValueStorage>, config: CartConfig) -> Self {
        let store = Self::new(storage, config);
        store.restore();
        store
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Restore persisted items, replacing the in-memory collection.
    ///
    /// Runs at most once per store; later calls return `0` and change
    /// nothing. Unreadable or malformed state restores as an empty cart.
    /// Returns the number of restored lines.
    #[instrument(skip(self), fields(key = %self.inner.config.storage_key))]
    pub fn restore(&self) -> usize {
        {
            let mut state = self.state();
            if state.phase() != CartPhase::Uninitialized {
                debug!(phase = %state.phase(), "Cart already restored");
                return 0;
            }
            state.set_phase(CartPhase::Restoring);
        }

        let restored = match load_items(
            self.inner.storage.as_ref(),
            &self.inner.config.storage_key,
        ) {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Failed to restore cart, starting empty");
                Vec::new()
            }
        };

        let mut state = self.state();
        state.replace_items(restored);
        state.set_phase(CartPhase::Ready);
        let count = state.items().len();
        info!(lines = count, items = state.item_count(), "Cart restored");
        self.commit(state, false);
        count
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> CartPhase {
        self.state().phase()
    }

    /// Write the current items immediately, cancelling any pending write.
    ///
    /// Does nothing before the store is ready.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the write fails. In-memory state is kept.
    pub fn flush(&self) -> Result<(), PersistError> {
        self.inner.pending.cancel();
        if !self.phase().is_ready() {
            debug!("Skipping cart flush before restore");
            return Ok(());
        }
        self.inner.persist()
    }

    /// Cancel any pending write without persisting.
    pub fn shutdown(&self) {
        if self.inner.pending.cancel() {
            debug!("Cancelled pending cart write");
        }
    }

    /// Whether a debounced write is scheduled and has not fired yet.
    #[must_use]
    pub fn has_pending_write(&self) -> bool {
        self.inner.pending.is_pending()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` of a product configuration.
    ///
    /// Lines with the same identity key merge, with the quantity clamped to
    /// the existing line's cap. Non-positive quantities count as 1. Returns
    /// the line's identity key.
    #[instrument(skip(self, candidate), fields(slug = %candidate.slug))]
    pub fn add_item(
        &self,
        candidate: ItemCandidate,
        quantity: i64,
        explicit_id: Option<LineItemId>,
    ) -> LineItemId {
        let id = explicit_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| candidate.identity_key());
        let quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);

        let mut state = self.state();
        let changed = state.add(candidate, quantity, id.clone());
        debug!(item_id = %id, quantity, changed, "Added item to cart");
        add_breadcrumb("cart", "Added item", Some(&[("item_id", id.as_str())]));
        self.commit(state, changed);
        id
    }

    /// Add one of a product configuration under its derived key.
    pub fn add(&self, candidate: ItemCandidate) -> LineItemId {
        self.add_item(candidate, 1, None)
    }

    /// Remove a line. Returns `false` if it was not in the cart.
    #[instrument(skip(self), fields(item_id = %id))]
    pub fn remove_item(&self, id: &LineItemId) -> bool {
        let mut state = self.state();
        let removed = state.remove(id);
        if removed {
            add_breadcrumb("cart", "Removed item", Some(&[("item_id", id.as_str())]));
        }
        self.commit(state, removed);
        removed
    }

    /// Set a line's quantity. Zero or negative removes the line.
    ///
    /// Returns `false` if nothing changed (unknown id, or same quantity).
    #[instrument(skip(self), fields(item_id = %id))]
    pub fn update_qty(&self, id: &LineItemId, quantity: i64) -> bool {
        let mut state = self.state();
        let changed = state.update_qty(id, quantity);
        self.commit(state, changed);
        changed
    }

    /// Remove every line.
    #[instrument(skip(self))]
    pub fn clear_cart(&self) {
        let mut state = self.state();
        let changed = state.clear();
        if changed {
            add_breadcrumb("cart", "Cleared cart", None);
        }
        self.commit(state, changed);
    }

    pub fn open_cart(&self) {
        self.set_open(true);
    }

    pub fn close_cart(&self) {
        self.set_open(false);
    }

    pub fn toggle_cart(&self) {
        let mut state = self.state();
        let open = !state.is_open();
        state.set_open(open);
        self.commit(state, false);
    }

    fn set_open(&self, open: bool) {
        let mut state = self.state();
        state.set_open(open);
        self.commit(state, false);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lines in display order.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.state().items().to_vec()
    }

    #[must_use]
    pub fn item(&self, id: &LineItemId) -> Option<LineItem> {
        self.state().item(id).cloned()
    }

    #[must_use]
    pub fn subtotal_cents(&self) -> u64 {
        self.state().subtotal_cents()
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state().item_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state().items().is_empty()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Items and totals derived right now.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::derive(&self.state())
    }

    /// Receive a fresh summary after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.inner.changes.subscribe()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn state(&self) -> MutexGuard<'_, CartState> {
        self.inner.lock_state()
    }

    /// Publish the new summary and, for item changes after restore, schedule
    /// a write.
    fn commit(&self, state: MutexGuard<'_, CartState>, items_changed: bool) {
        self.inner.changes.send_replace(CartSummary::derive(&state));
        let ready = state.phase().is_ready();
        drop(state);

        if items_changed && ready {
            self.schedule_persist();
        }
    }

    fn schedule_persist(&self) {
        let Ok(runtime) = Handle::try_current() else {
            debug!("No async runtime, writing cart synchronously");
            self.inner.persist_logged();
            return;
        };

        let weak: Weak<CartStoreInner> = Arc::downgrade(&self.inner);
        let delay = self.inner.config.debounce;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.persist_logged();
            }
        });
        self.inner.pending.replace(handle);
    }
}

impl CartStoreInner {
    fn lock_state(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the items as they are now.
    fn persist(&self) -> Result<(), PersistError> {
        let _write = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let items = self.lock_state().items().to_vec();
        save_items(self.storage.as_ref(), &self.config.storage_key, &items)?;
        debug!(lines = items.len(), "Cart persisted");
        Ok(())
    }

    fn persist_logged(&self) {
        if let Err(e) = self.persist() {
            error!(
                error = %e,
                key = %self.config.storage_key,
                "Failed to persist cart"
            );
        }
    }
}

impl Drop for CartStoreInner {
    fn drop(&mut self) {
        if self.pending.cancel() {
            debug!("Cart store dropped, pending write cancelled");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::storage::MemoryStorage;

    const KEY: &str = "gbones:cart:v1";

    fn tee() -> ItemCandidate {
        ItemCandidate::new("tee", "Tee", 1000, "EUR")
    }

    fn config() -> CartConfig {
        CartConfig {
            storage_key: KEY.to_string(),
            debounce: Duration::from_millis(500),
        }
    }

    fn stored(storage: &MemoryStorage) -> Vec<LineItem> {
        load_items(storage, KEY).unwrap()
    }

    #[test]
    fn test_empty_cart() {
        let cart = CartStore::open(Arc::new(MemoryStorage::new()), config());
        assert_eq!(cart.subtotal_cents(), 0);
        assert_eq!(cart.item_count(), 0);
        assert!(cart.items().is_empty());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_tee_scenario() {
        let cart = CartStore::open(Arc::new(MemoryStorage::new()), config());
        let id = cart.add_item(tee(), 2, None);
        cart.add_item(tee(), 1, None);

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(cart.item(&id).unwrap().quantity, 3);
        assert_eq!(cart.subtotal_cents(), 3000);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_non_positive_add_counts_as_one() {
        let cart = CartStore::open(Arc::new(MemoryStorage::new()), config());
        let id = cart.add_item(tee(), 0, None);
        cart.add_item(tee(), -4, None);
        assert_eq!(cart.item(&id).unwrap().quantity, 2);
    }

    #[test]
    fn test_explicit_id() {
        let cart = CartStore::open(Arc::new(MemoryStorage::new()), config());
        let explicit = LineItemId::parse("gift-wrap-tee").unwrap();
        let id = cart.add_item(tee(), 1, Some(explicit.clone()));
        assert_eq!(id, explicit);

        // Same product under its derived key is a separate line
        cart.add(tee());
        assert_eq!(cart.items().len(), 2);
    }

    #[test]
    fn test_max_qty_clamp() {
        let cart = CartStore::open(Arc::new(MemoryStorage::new()), config());
        let id = cart.add_item(tee().with_max_qty(5), 1, None);
        cart.update_qty(&id, 10);
        assert_eq!(cart.item(&id).unwrap().quantity, 5);
    }

    #[test]
    fn test_update_to_zero_removes() {
        let cart = CartStore::open(Arc::new(MemoryStorage::new()), config());
        let id = cart.add(tee());
        assert!(cart.update_qty(&id, 0));
        assert!(cart.item(&id).is_none());
        assert!(!cart.remove_item(&id));
    }

    #[test]
    fn test_open_flag_is_transient() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartStore::open(storage.clone(), config());
        cart.open_cart();
        assert!(cart.is_open());
        cart.toggle_cart();
        assert!(!cart.is_open());
        cart.toggle_cart();
        cart.close_cart();
        assert!(!cart.is_open());
        assert_eq!(storage.writes(), 0);
    }

    #[test]
    fn test_without_runtime_writes_synchronously() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartStore::open(storage.clone(), config());
        cart.add(tee());
        assert_eq!(storage.writes(), 1);
        assert_eq!(stored(&storage), cart.items());
    }

    #[test]
    fn test_restore_only_once() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartStore::new(storage.clone(), config());
        assert_eq!(cart.phase(), CartPhase::Uninitialized);
        cart.restore();
        assert_eq!(cart.phase(), CartPhase::Ready);

        cart.add(tee());
        save_items(storage.as_ref(), KEY, &[]).unwrap();
        assert_eq!(cart.restore(), 0);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_corrupted_storage_restores_empty() {
        let storage = Arc::new(MemoryStorage::new().with_entry(KEY, "not json at all"));
        let cart = CartStore::open(storage, config());
        assert!(cart.is_empty());
        assert_eq!(cart.phase(), CartPhase::Ready);
    }

    #[test]
    fn test_flush_before_restore_writes_nothing() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartStore::new(storage.clone(), config());
        cart.add(tee());
        cart.flush().unwrap();
        assert_eq!(storage.writes(), 0);
    }

    #[test]
    fn test_subscribe_sees_changes() {
        let cart = CartStore::open(Arc::new(MemoryStorage::new()), config());
        let mut changes = cart.subscribe();
        cart.add_item(tee(), 2, None);
        cart.open_cart();

        assert!(changes.has_changed().unwrap());
        let summary = changes.borrow_and_update().clone();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.subtotal_cents, 2000);
        assert!(summary.is_open);
        assert_eq!(summary, cart.summary());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_collapses_burst() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartStore::open(storage.clone(), config());

        let id = cart.add(tee());
        for quantity in 2..=6 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cart.update_qty(&id, quantity);
        }
        assert!(cart.has_pending_write());
        assert_eq!(storage.writes(), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(storage.writes(), 1);
        assert_eq!(stored(&storage)[0].quantity, 6);
        assert!(!cart.has_pending_write());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_write() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartStore::open(storage.clone(), config());
        cart.add(tee());
        cart.shutdown();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(storage.writes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persist_failure_keeps_memory() {
        let storage = Arc::new(MemoryStorage::with_quota(10));
        let cart = CartStore::open(storage.clone(), config());
        cart.add_item(tee(), 3, None);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(storage.writes(), 0);
        assert_eq!(cart.item_count(), 3);
        assert!(cart.flush().is_err());
    }
}
