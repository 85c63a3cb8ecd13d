//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `GBONES_STORAGE_DIR` - Directory backing client-local storage (default: .gbones)
//! - `GBONES_CART_STORAGE_KEY` - Storage key holding the cart (default: gbones:cart:v1)
//! - `GBONES_CART_DEBOUNCE_MS` - Quiescence window before a cart write (default: 500)
//! - `GBONES_STORAGE_QUOTA_BYTES` - Maximum bytes per storage entry (default: unlimited)
//! - `GBONES_CATALOG_LATENCY_MS` - Simulated catalog provider latency (default: 100)
//! - `GBONES_CATALOG_CACHE_TTL_SECS` - Catalog response cache TTL (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Default storage key for the persisted cart.
pub const DEFAULT_CART_STORAGE_KEY: &str = "gbones:cart:v1";

/// Default debounce window for cart writes.
pub const DEFAULT_CART_DEBOUNCE: Duration = Duration::from_millis(500);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory backing client-local storage
    pub storage_dir: PathBuf,
    /// Maximum size of a single stored value, in bytes
    pub storage_quota_bytes: Option<usize>,
    /// Cart store configuration
    pub cart: CartConfig,
    /// Catalog provider configuration
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "development")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Namespaced key the cart is persisted under
    pub storage_key: String,
    /// Quiescence window before a pending write fires
    pub debounce: Duration,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_CART_STORAGE_KEY.to_string(),
            debounce: DEFAULT_CART_DEBOUNCE,
        }
    }
}

/// Catalog provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Simulated provider latency
    pub latency: Duration,
    /// Response cache TTL
    pub cache_ttl: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(100),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".gbones"),
            storage_quota_bytes: None,
            cart: CartConfig::default(),
            catalog: CatalogConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_dir = lookup("GBONES_STORAGE_DIR").map_or(defaults.storage_dir, PathBuf::from);
        let storage_quota_bytes = parse_optional(&lookup, "GBONES_STORAGE_QUOTA_BYTES")?;

        let cart = CartConfig {
            storage_key: lookup("GBONES_CART_STORAGE_KEY")
                .filter(|key| !key.is_empty())
                .unwrap_or(defaults.cart.storage_key),
            debounce: parse_optional(&lookup, "GBONES_CART_DEBOUNCE_MS")?
                .map_or(defaults.cart.debounce, Duration::from_millis),
        };

        let catalog = CatalogConfig {
            latency: parse_optional(&lookup, "GBONES_CATALOG_LATENCY_MS")?
                .map_or(defaults.catalog.latency, Duration::from_millis),
            cache_ttl: parse_optional(&lookup, "GBONES_CATALOG_CACHE_TTL_SECS")?
                .map_or(defaults.catalog.cache_ttl, Duration::from_secs),
        };

        let sentry_sample_rate: f32 =
            parse_optional(&lookup, "SENTRY_SAMPLE_RATE")?.unwrap_or(defaults.sentry_sample_rate);
        if !(0.0..=1.0).contains(&sentry_sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_SAMPLE_RATE".to_string(),
                format!("must be between 0.0 and 1.0 (got {sentry_sample_rate})"),
            ));
        }

        Ok(Self {
            storage_dir,
            storage_quota_bytes,
            cart,
            catalog,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, failing only if it is set and malformed.
fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.cart.storage_key, "gbones:cart:v1");
        assert_eq!(config.cart.debounce, Duration::from_millis(500));
        assert_eq!(config.storage_dir, PathBuf::from(".gbones"));
        assert_eq!(config.storage_quota_bytes, None);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("GBONES_STORAGE_DIR", "/tmp/profile"),
            ("GBONES_CART_STORAGE_KEY", "shop:cart:v2"),
            ("GBONES_CART_DEBOUNCE_MS", "250"),
            ("GBONES_STORAGE_QUOTA_BYTES", "4096"),
            ("GBONES_CATALOG_LATENCY_MS", "0"),
            ("GBONES_CATALOG_CACHE_TTL_SECS", "60"),
        ]))
        .unwrap();

        assert_eq!(config.storage_dir, PathBuf::from("/tmp/profile"));
        assert_eq!(config.cart.storage_key, "shop:cart:v2");
        assert_eq!(config.cart.debounce, Duration::from_millis(250));
        assert_eq!(config.storage_quota_bytes, Some(4096));
        assert_eq!(config.catalog.latency, Duration::ZERO);
        assert_eq!(config.catalog.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_debounce() {
        let result =
            StorefrontConfig::from_lookup(lookup_from(&[("GBONES_CART_DEBOUNCE_MS", "soon")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(name, _)) if name == "GBONES_CART_DEBOUNCE_MS"));
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        let result = StorefrontConfig::from_lookup(lookup_from(&[("SENTRY_SAMPLE_RATE", "1.5")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_storage_key_falls_back() {
        let config =
            StorefrontConfig::from_lookup(lookup_from(&[("GBONES_CART_STORAGE_KEY", "")])).unwrap();
        assert_eq!(config.cart.storage_key, DEFAULT_CART_STORAGE_KEY);
    }
}
