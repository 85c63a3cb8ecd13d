//! Core types for Gbones.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod line_item;
pub mod price;

pub use id::{IdError, LineItemId};
pub use line_item::{ItemCandidate, LineItem};
pub use price::{CurrencyCode, Money, format_eur, format_eur_halved, half_cents};
