//! Domain types for the product catalog.

use serde::{Deserialize, Serialize};

use gbones_core::{ItemCandidate, format_eur_halved};

/// Variant name used by products without real options.
pub const DEFAULT_VARIANT_NAME: &str = "Default";

/// A product as returned by the catalog provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Provider product ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL handle, also the cart line slug.
    pub slug: String,
    pub description: String,
    /// Base price in minor currency units.
    pub price_cents: u64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Image URLs, first is the primary image.
    pub images: Vec<String>,
    pub variants: Vec<ProductVariant>,
    /// Category slug (e.g., "apparel").
    pub category: Option<String>,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: String,
    pub name: String,
    pub price_cents: u64,
}

/// One page of a catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Whether more products exist past this page.
    pub has_next_page: bool,
}

impl Product {
    /// Cart candidate for the product's base configuration.
    #[must_use]
    pub fn to_candidate(&self) -> ItemCandidate {
        let mut candidate =
            ItemCandidate::new(&self.slug, &self.name, self.price_cents, &self.currency);
        candidate.image = self.images.first().cloned();
        candidate
    }

    /// Cart candidate for a named variant.
    ///
    /// The placeholder "Default" variant maps to the base configuration, so
    /// it shares a cart line with [`to_candidate`](Self::to_candidate).
    #[must_use]
    pub fn variant_candidate(&self, name: &str) -> Option<ItemCandidate> {
        let variant = self
            .variants
            .iter()
            .find(|variant| variant.name.eq_ignore_ascii_case(name))?;

        let mut candidate = self.to_candidate();
        candidate.price_cents = variant.price_cents;
        if variant.name != DEFAULT_VARIANT_NAME {
            candidate.variant = Some(variant.name.clone());
        }
        Some(candidate)
    }

    /// Price as shown on the storefront (halved, EUR).
    #[must_use]
    pub fn display_price(&self) -> String {
        format_eur_halved(self.price_cents)
    }

    /// Case-insensitive match on name or description.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}
