//! Cart line items.
//!
//! # Persisted layout
//!
//! Line items serialize with camelCase field names, optional fields omitted
//! when absent:
//!
//! ```json
//! {"id":"tee:M","slug":"tee","title":"Tee","priceCents":1000,"currency":"EUR",
//!  "image":"https://...","size":"M","quantity":2,"maxQty":5}
//! ```

use serde::{Deserialize, Serialize};

use super::id::LineItemId;

/// Display data for a product configuration about to be added to the cart.
///
/// Everything a [`LineItem`] carries except its identity key and quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCandidate {
    pub slug: String,
    pub title: String,
    /// Unit price in minor currency units.
    pub price_cents: u64,
    /// ISO 4217 currency code (e.g., "EUR").
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Maximum quantity allowed for this line. `0` means no cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_qty: Option<u32>,
}

impl ItemCandidate {
    /// Create a candidate with only the required fields set.
    #[must_use]
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        price_cents: u64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            price_cents,
            currency: currency.into(),
            image: None,
            variant: None,
            size: None,
            color: None,
            max_qty: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub const fn with_max_qty(mut self, max_qty: u32) -> Self {
        self.max_qty = Some(max_qty);
        self
    }

    /// The identity key this candidate maps to when no explicit id is given.
    #[must_use]
    pub fn identity_key(&self) -> LineItemId {
        LineItemId::derive(
            &self.slug,
            self.variant.as_deref(),
            self.size.as_deref(),
            self.color.as_deref(),
        )
    }
}

/// One distinct purchasable configuration in the cart.
///
/// ## Invariants
///
/// - `quantity >= 1` while the item is in a cart
/// - `quantity <= max_qty` when a cap is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Empty when the stored entry had no id; see [`normalized`](Self::normalized).
    #[serde(default)]
    pub id: LineItemId,
    pub slug: String,
    pub title: String,
    /// Unit price in minor currency units.
    pub price_cents: u64,
    /// ISO 4217 currency code.
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_qty: Option<u32>,
}

impl LineItem {
    /// Build a line from a candidate, clamping `quantity` into `1..=max_qty`.
    #[must_use]
    pub fn from_candidate(candidate: ItemCandidate, id: LineItemId, quantity: u32) -> Self {
        let mut item = Self {
            id,
            slug: candidate.slug,
            title: candidate.title,
            price_cents: candidate.price_cents,
            currency: candidate.currency,
            image: candidate.image,
            variant: candidate.variant,
            size: candidate.size,
            color: candidate.color,
            quantity: 1,
            max_qty: candidate.max_qty.filter(|cap| *cap > 0),
        };
        item.quantity = item.clamp_quantity(u64::from(quantity));
        item
    }

    /// The effective quantity cap, if any.
    #[must_use]
    pub fn cap(&self) -> Option<u32> {
        self.max_qty.filter(|cap| *cap > 0)
    }

    /// Clamp a requested quantity into `1..=cap`.
    #[must_use]
    pub fn clamp_quantity(&self, requested: u64) -> u32 {
        let capped = self
            .cap()
            .map_or(requested, |cap| requested.min(u64::from(cap)));
        u32::try_from(capped).unwrap_or(u32::MAX).max(1)
    }

    /// Increase the quantity by `amount`, respecting the cap.
    pub fn increment(&mut self, amount: u32) {
        self.quantity = self.clamp_quantity(u64::from(self.quantity) + u64::from(amount));
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total_cents(&self) -> u64 {
        self.price_cents.saturating_mul(u64::from(self.quantity))
    }

    /// The identity key derived from this item's configuration.
    #[must_use]
    pub fn derived_id(&self) -> LineItemId {
        LineItemId::derive(
            &self.slug,
            self.variant.as_deref(),
            self.size.as_deref(),
            self.color.as_deref(),
        )
    }

    /// Bring an item read from storage back within the invariants.
    ///
    /// Returns `None` for items that cannot exist in a cart (zero quantity).
    #[must_use]
    pub fn normalized(mut self) -> Option<Self> {
        if self.quantity == 0 {
            return None;
        }
        self.max_qty = self.cap();
        self.quantity = self.clamp_quantity(u64::from(self.quantity));
        if self.id.is_empty() {
            self.id = self.derived_id();
        }
        Some(self)
    }
}
