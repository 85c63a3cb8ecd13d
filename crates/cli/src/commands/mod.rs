//! Command implementations.

use thiserror::Error;

use gbones_core::IdError;
use gbones_storefront::cart::PersistError;
use gbones_storefront::catalog::CatalogError;
use gbones_storefront::error::StorefrontError;

pub mod cart;
pub mod catalog;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Storefront operation failed or rejected the input.
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// Output could not be rendered as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Log the error, capturing storefront faults to Sentry.
    pub fn report(&self) {
        match self {
            Self::Storefront(e) => e.report(),
            Self::Json(e) => tracing::error!(error = %e, "Failed to render output"),
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        Self::Storefront(e.into())
    }
}

impl From<PersistError> for CliError {
    fn from(e: PersistError) -> Self {
        Self::Storefront(e.into())
    }
}

impl From<IdError> for CliError {
    fn from(e: IdError) -> Self {
        Self::Storefront(StorefrontError::BadRequest(e.to_string()))
    }
}
