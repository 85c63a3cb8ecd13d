//! Product catalog contract.
//!
//! # Architecture
//!
//! - The cart never calls the catalog; product display code does, and passes
//!   plain display data into [`CartStore::add_item`](crate::cart::CartStore::add_item)
//! - [`CatalogProvider`] is the seam to an external commerce data provider
//! - [`MockCatalog`] serves development data without an API
//! - [`CatalogClient`] caches provider responses via `moka` (5 minute TTL by default)
//!
//! # Example
//!
//! ```rust,ignore
//! use gbones_storefront::catalog::{CatalogClient, MockCatalog};
//!
//! let catalog = CatalogClient::new(MockCatalog::default(), &config.catalog);
//!
//! let product = catalog.get("minimalist-white-tee").await?;
//! cart.add_item(product.to_candidate(), 1, None);
//! ```

mod cache;
mod mock;
pub mod types;

pub use mock::MockCatalog;
pub use types::{Product, ProductPage, ProductVariant};

use std::future::Future;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::CatalogConfig;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with the given slug.
    #[error("Product not found: {0}")]
    NotFound(String),
}

/// A source of product data.
pub trait CatalogProvider: Send + Sync {
    /// The first `first` products, and whether more exist.
    fn browse(&self, first: usize) -> impl Future<Output = ProductPage> + Send;

    /// A single product by slug.
    fn get(&self, slug: &str) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// Products whose name or description contains `query`, case-insensitive.
    fn search(&self, query: &str) -> impl Future<Output = Vec<Product>> + Send;

    /// Products in a category.
    fn category(&self, slug: &str) -> impl Future<Output = Vec<Product>> + Send;
}

/// Caching front for a [`CatalogProvider`].
///
/// Products, listings and categories are cached; searches always hit the
/// provider.
pub struct CatalogClient<P> {
    provider: P,
    cache: Cache<CacheKey, CacheValue>,
}

impl<P: CatalogProvider> CatalogClient<P> {
    /// Wrap `provider` with a response cache.
    #[must_use]
    pub fn new(provider: P, config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Self { provider, cache }
    }

    /// The first `first` products.
    #[instrument(skip(self))]
    pub async fn browse(&self, first: usize) -> ProductPage {
        let key = CacheKey::Browse { first };
        if let Some(CacheValue::Page(page)) = self.cache.get(&key).await {
            debug!("Cache hit for product listing");
            return page;
        }

        let page = self.provider.browse(first).await;
        self.cache.insert(key, CacheValue::Page(page.clone())).await;
        page
    }

    /// A single product by slug.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this slug.
    #[instrument(skip(self))]
    pub async fn get(&self, slug: &str) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(slug.to_string());
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product = self.provider.get(slug).await?;
        self.cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Search the catalog. Not cached.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Vec<Product> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        self.provider.search(query).await
    }

    /// Products in a category.
    #[instrument(skip(self))]
    pub async fn category(&self, slug: &str) -> Vec<Product> {
        let key = CacheKey::Category(slug.to_string());
        if let Some(CacheValue::Products(products)) = self.cache.get(&key).await {
            debug!("Cache hit for category");
            return products;
        }

        let products = self.provider.category(slug).await;
        self.cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;
        products
    }

    /// Drop every cached response.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    /// Provider that counts how often it is asked for a product.
    struct CountingCatalog {
        inner: MockCatalog,
        gets: AtomicUsize,
    }

    impl CatalogProvider for CountingCatalog {
        async fn browse(&self, first: usize) -> ProductPage {
            self.inner.browse(first).await
        }

        async fn get(&self, slug: &str) -> Result<Product, CatalogError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get(slug).await
        }

        async fn search(&self, query: &str) -> Vec<Product> {
            self.inner.search(query).await
        }

        async fn category(&self, slug: &str) -> Vec<Product> {
            self.inner.category(slug).await
        }
    }

    fn client() -> CatalogClient<CountingCatalog> {
        CatalogClient::new(
            CountingCatalog {
                inner: MockCatalog::new(Duration::ZERO),
                gets: AtomicUsize::new(0),
            },
            &CatalogConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_get_is_cached() {
        let client = client();
        let first = client.get("minimalist-watch").await.unwrap();
        let second = client.get("minimalist-watch").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(client.provider.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let client = client();
        assert!(client.get("missing").await.is_err());
        assert!(client.get("missing").await.is_err());
        assert_eq!(client.provider.gets.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let client = client();
        client.get("minimalist-watch").await.unwrap();
        client.invalidate_all();
        client.get("minimalist-watch").await.unwrap();
        assert_eq!(client.provider.gets.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_blank_search() {
        assert!(client().search("   ").await.is_empty());
        assert_eq!(client().search("watch").await.len(), 1);
    }
}
