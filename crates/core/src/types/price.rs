//! Money representation and display formatting.
//!
//! Cart amounts are stored as integer minor units (cents). This module turns
//! them into decimal amounts for display. Storefront prices are shown in EUR
//! using Spanish conventions (`1.234,50 €` style), and catalog prices are
//! displayed at half their stored value.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimum number of integer digits before thousands grouping kicks in.
///
/// Spanish formatting leaves four-digit amounts ungrouped (`1234,56 €`).
const MIN_GROUPING_DIGITS: usize = 5;

/// ISO 4217 currency codes with a known display symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    USD,
    #[default]
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Parse a currency code (case-insensitive).
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            "CAD" => Some(Self::CAD),
            "AUD" => Some(Self::AUD),
            _ => None,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

/// An amount of money in a given currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., euros, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code as supplied by the catalog.
    pub currency_code: String,
}

impl Money {
    /// Create a money value from minor units.
    #[must_use]
    pub fn from_cents(cents: u64, currency_code: impl Into<String>) -> Self {
        Self {
            amount: cents_to_decimal(cents),
            currency_code: currency_code.into(),
        }
    }

    /// The currency, if it is one we know how to symbolize.
    #[must_use]
    pub fn currency(&self) -> Option<CurrencyCode> {
        CurrencyCode::parse(&self.currency_code)
    }

    /// Format for display.
    ///
    /// EUR uses Spanish conventions; other known currencies use a leading
    /// symbol; unknown codes fall back to `CODE 12.34`.
    #[must_use]
    pub fn display(&self) -> String {
        match self.currency() {
            Some(CurrencyCode::EUR) => format_es(self.amount),
            Some(code) => format!("{}{:.2}", code.symbol(), self.amount),
            None => format!("{} {:.2}", self.currency_code, self.amount),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Halve a price in cents for display, rounding halves up.
///
/// ```
/// use gbones_core::half_cents;
///
/// assert_eq!(half_cents(2999), 1500);
/// assert_eq!(half_cents(3000), 1500);
/// ```
#[must_use]
pub const fn half_cents(cents: u64) -> u64 {
    cents / 2 + cents % 2
}

/// Format minor units as Spanish-locale EUR, e.g. `14,99 €`.
///
/// ```
/// use gbones_core::format_eur;
///
/// assert_eq!(format_eur(1499), "14,99 €");
/// assert_eq!(format_eur(1234567), "12.345,67 €");
/// ```
#[must_use]
pub fn format_eur(cents: u64) -> String {
    format_es(cents_to_decimal(cents))
}

/// Format a stored catalog price at half its value.
#[must_use]
pub fn format_eur_halved(cents: u64) -> String {
    format_eur(half_cents(cents))
}

fn cents_to_decimal(cents: u64) -> Decimal {
    Decimal::from(cents) / Decimal::ONE_HUNDRED
}

fn format_es(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let (sign, digits) = whole
        .strip_prefix('-')
        .map_or(("", whole), |rest| ("-", rest));

    format!("{sign}{},{fraction} €", group_thousands(digits))
}

fn group_thousands(digits: &str) -> String {
    if digits.len() < MIN_GROUPING_DIGITS {
        return digits.to_string();
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_eur_small_amounts() {
        assert_eq!(format_eur(0), "0,00 €");
        assert_eq!(format_eur(5), "0,05 €");
        assert_eq!(format_eur(2998), "29,98 €");
    }

    #[test]
    fn test_format_eur_grouping() {
        assert_eq!(format_eur(123_456), "1234,56 €");
        assert_eq!(format_eur(1_234_567), "12.345,67 €");
        assert_eq!(format_eur(123_456_789), "1.234.567,89 €");
    }

    #[test]
    fn test_half_cents_rounds_up() {
        assert_eq!(half_cents(0), 0);
        assert_eq!(half_cents(1), 1);
        assert_eq!(half_cents(7900), 3950);
        assert_eq!(half_cents(3501), 1751);
    }

    #[test]
    fn test_format_eur_halved() {
        assert_eq!(format_eur_halved(7900), "39,50 €");
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(1999, "USD").display(), "$19.99");
        assert_eq!(Money::from_cents(500, "gbp").display(), "£5.00");
        assert_eq!(Money::from_cents(1999, "EUR").display(), "19,99 €");
        assert_eq!(Money::from_cents(1250, "JPY").to_string(), "JPY 12.50");
    }

    #[test]
    fn test_currency_code_roundtrip() {
        for code in ["USD", "EUR", "GBP", "CAD", "AUD"] {
            assert_eq!(CurrencyCode::parse(code).map(CurrencyCode::code), Some(code));
        }
        assert_eq!(CurrencyCode::parse("XYZ"), None);
    }
}
