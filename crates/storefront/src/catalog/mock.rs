//! In-memory catalog used during development.
//!
//! Serves a fixed set of products with simulated provider latency.

use std::time::Duration;

use tracing::instrument;

use super::types::{Product, ProductPage, ProductVariant};
use super::{CatalogError, CatalogProvider};

/// Development catalog provider.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    products: Vec<Product>,
    latency: Duration,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl MockCatalog {
    /// The development catalog with the given simulated latency.
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self::with_products(seed_products(), latency)
    }

    /// A catalog serving `products`.
    #[must_use]
    pub const fn with_products(products: Vec<Product>, latency: Duration) -> Self {
        Self { products, latency }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl CatalogProvider for MockCatalog {
    #[instrument(skip(self))]
    async fn browse(&self, first: usize) -> ProductPage {
        self.simulate_latency().await;
        ProductPage {
            products: self.products.iter().take(first).cloned().collect(),
            has_next_page: self.products.len() > first,
        }
    }

    #[instrument(skip(self))]
    async fn get(&self, slug: &str) -> Result<Product, CatalogError> {
        self.simulate_latency().await;
        self.products
            .iter()
            .find(|product| product.slug == slug)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(slug.to_string()))
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Vec<Product> {
        self.simulate_latency().await;
        self.products
            .iter()
            .filter(|product| product.matches(query))
            .cloned()
            .collect()
    }

    #[instrument(skip(self))]
    async fn category(&self, slug: &str) -> Vec<Product> {
        self.simulate_latency().await;
        self.products
            .iter()
            .filter(|product| product.category.as_deref() == Some(slug))
            .cloned()
            .collect()
    }
}

fn product(
    n: u32,
    name: &str,
    slug: &str,
    description: &str,
    price_cents: u64,
    images: [&str; 2],
    category: &str,
) -> Product {
    Product {
        id: format!("prod_{n}"),
        name: name.to_string(),
        slug: slug.to_string(),
        description: description.to_string(),
        price_cents,
        currency: "USD".to_string(),
        images: images
            .iter()
            .map(|photo| format!("https://images.unsplash.com/{photo}?w=800&q=80"))
            .collect(),
        variants: vec![ProductVariant {
            id: format!("var_{n}"),
            name: super::types::DEFAULT_VARIANT_NAME.to_string(),
            price_cents,
        }],
        category: Some(category.to_string()),
    }
}

fn seed_products() -> Vec<Product> {
    vec![
        product(
            1,
            "Classic Black Hoodie",
            "classic-black-hoodie",
            "Premium cotton hoodie with minimalist design. Perfect for everyday wear.",
            7900,
            ["photo-1556821840-3a63f95609a7", "photo-1620799140408-edc6dcb6d633"],
            "apparel",
        ),
        product(
            2,
            "Urban Streetwear Jacket",
            "urban-streetwear-jacket",
            "Lightweight jacket with modern cut. Features multiple pockets and adjustable fit.",
            12900,
            ["photo-1591047139829-d91aecb6caea", "photo-1551028719-00167b16eac5"],
            "apparel",
        ),
        product(
            3,
            "Minimalist White Tee",
            "minimalist-white-tee",
            "Essential white t-shirt made from organic cotton. Timeless and versatile.",
            3500,
            ["photo-1521572163474-6864f9cf17ab", "photo-1622445275463-afa2ab738c34"],
            "apparel",
        ),
        product(
            4,
            "Designer Sunglasses",
            "designer-sunglasses",
            "Modern aviator style with UV protection. Includes premium case.",
            8900,
            ["photo-1572635196237-14b3f281503f", "photo-1511499767150-a48a237f0083"],
            "accessories",
        ),
        product(
            5,
            "Leather Crossbody Bag",
            "leather-crossbody-bag",
            "Handcrafted leather bag with adjustable strap. Multiple compartments for organization.",
            15900,
            ["photo-1590874103328-eac38a683ce7", "photo-1548036328-c9fa89d128fa"],
            "accessories",
        ),
        product(
            6,
            "Minimalist Watch",
            "minimalist-watch",
            "Clean design with leather strap. Japanese quartz movement.",
            19900,
            ["photo-1524805444758-089113d48a6d", "photo-1523170335258-f5ed11844a49"],
            "accessories",
        ),
    ]
}
