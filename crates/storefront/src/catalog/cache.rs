//! Cache types for catalog responses.

use super::types::{Product, ProductPage};

/// Cache key for products and listings.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(String),
    Browse { first: usize },
    Category(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Page(ProductPage),
    Products(Vec<Product>),
}
