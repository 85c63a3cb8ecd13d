//! Unified error handling with Sentry integration.
//!
//! Cart mutations never fail; everything that can go wrong inside the store
//! is logged and recovered. `StorefrontError` covers the operations that do
//! surface errors to a caller: loading configuration, explicit flushes, and
//! catalog lookups.

use thiserror::Error;

use crate::cart::PersistError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client-local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Writing the cart failed.
    #[error("Persist error: {0}")]
    Persist(#[from] PersistError),

    /// Catalog lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Bad input from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl StorefrontError {
    /// Whether this error reflects a fault worth reporting to Sentry, as
    /// opposed to a caller mistake.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Persist(_))
    }

    /// Log the error, capturing faults to Sentry.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Storefront error");
        }
    }
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("item_id", "tee:M")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
