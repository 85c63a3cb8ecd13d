//! Application state shared across the presentation shell.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::{CatalogClient, MockCatalog};
use crate::config::StorefrontConfig;
use crate::storage::{FileStorage, KeyValueStorage};

/// Application state handed to the root of the component tree.
///
/// This struct is cheaply cloneable via `Arc` and is the only way
/// descendants reach the cart and the catalog.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: CartStore,
    catalog: CatalogClient<MockCatalog>,
}

impl AppState {
    /// Create application state backed by file storage in the configured
    /// profile directory. The cart is not restored yet.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(
            FileStorage::new(&config.storage_dir).with_quota(config.storage_quota_bytes),
        );
        Self::with_storage(config, storage)
    }

    /// Create application state over an explicit storage backend.
    #[must_use]
    pub fn with_storage(config: StorefrontConfig, storage: Arc<dyn KeyValueStorage>) -> Self {
        let cart = CartStore::new(storage, config.cart.clone());
        let catalog = CatalogClient::new(MockCatalog::new(config.catalog.latency), &config.catalog);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                cart,
                catalog,
            }),
        }
    }

    /// Create application state and restore the cart.
    #[must_use]
    pub fn open(config: StorefrontConfig) -> Self {
        let state = Self::new(config);
        state.cart().restore();
        state
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the session's cart.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient<MockCatalog> {
        &self.inner.catalog
    }
}
