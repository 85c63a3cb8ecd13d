//! Integration tests for Gbones.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gbones-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart store against file-backed storage
//! - `catalog_to_cart` - Catalog lookups feeding the cart through `AppState`
//!
//! Every test runs against a fresh temporary profile directory.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gbones_storefront::config::{CartConfig, CatalogConfig, StorefrontConfig};
use gbones_storefront::storage::{FileStorage, KeyValueStorage};
use tempfile::TempDir;

/// Storage key used by every test profile.
pub const TEST_KEY: &str = "gbones:cart:v1";

/// Debounce window used by every test profile.
pub const TEST_DEBOUNCE: Duration = Duration::from_millis(500);

/// A temporary profile directory with file storage inside it.
pub struct TestProfile {
    dir: TempDir,
}

impl TestProfile {
    /// Create an empty profile.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create tempdir: {e}"));
        Self { dir }
    }

    /// The profile directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Storefront configuration rooted at this profile, with no catalog
    /// latency.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            storage_dir: self.path().to_path_buf(),
            cart: cart_config(),
            catalog: CatalogConfig {
                latency: Duration::ZERO,
                ..CatalogConfig::default()
            },
            ..StorefrontConfig::default()
        }
    }

    /// File storage over this profile.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn KeyValueStorage> {
        Arc::new(FileStorage::new(self.path()))
    }

    /// File storage over this profile with a byte quota.
    #[must_use]
    pub fn storage_with_quota(&self, limit: usize) -> Arc<dyn KeyValueStorage> {
        Arc::new(FileStorage::new(self.path()).with_quota(Some(limit)))
    }

    /// Raw stored cart payload, if any.
    ///
    /// # Panics
    ///
    /// Panics if the storage cannot be read.
    #[must_use]
    pub fn raw_cart(&self) -> Option<String> {
        FileStorage::new(self.path())
            .get_item(TEST_KEY)
            .unwrap_or_else(|e| panic!("failed to read cart: {e}"))
    }

    /// Overwrite the stored cart payload.
    ///
    /// # Panics
    ///
    /// Panics if the storage cannot be written.
    pub fn write_raw_cart(&self, payload: &str) {
        FileStorage::new(self.path())
            .set_item(TEST_KEY, payload)
            .unwrap_or_else(|e| panic!("failed to write cart: {e}"));
    }
}

impl Default for TestProfile {
    fn default() -> Self {
        Self::new()
    }
}

/// Cart configuration used by tests.
#[must_use]
pub fn cart_config() -> CartConfig {
    CartConfig {
        storage_key: TEST_KEY.to_string(),
        debounce: TEST_DEBOUNCE,
    }
}
