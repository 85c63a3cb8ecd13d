//! Line item identity keys.
//!
//! A cart line is identified by a deterministic composite of the product slug
//! and its optional variant, size and color, joined with `:` in that order.
//! Two additions that produce the same key merge into one line.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Separator between the parts of a derived identity key.
pub const KEY_SEPARATOR: char = ':';

/// Errors that can occur when parsing a [`LineItemId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("line item id cannot be empty")]
    Empty,
}

/// Identity key of a cart line.
///
/// ## Examples
///
/// ```
/// use gbones_core::LineItemId;
///
/// let id = LineItemId::derive("tee", Some("organic"), Some("M"), None);
/// assert_eq!(id.as_str(), "tee:organic:M");
///
/// // Empty parts are skipped, same as absent ones
/// let id = LineItemId::derive("tee", Some(""), None, Some("black"));
/// assert_eq!(id.as_str(), "tee:black");
///
/// assert!(LineItemId::parse("").is_err());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    /// Derive the identity key from a slug and its optional configuration.
    #[must_use]
    pub fn derive(
        slug: &str,
        variant: Option<&str>,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Self {
        let mut key = String::from(slug);
        for part in [variant, size, color].into_iter().flatten() {
            if part.is_empty() {
                continue;
            }
            key.push(KEY_SEPARATOR);
            key.push_str(part);
        }
        Self(key)
    }

    /// Parse an explicit caller-supplied identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Empty`] if the input is empty.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the key is empty (only possible for persisted data).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the key and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for LineItemId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for LineItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
