//! Cart store lifecycle.
//!
//! ```text
//! Uninitialized --restore()--> Restoring --> Ready
//! ```
//!
//! Persistence writes are only scheduled in `Ready`, so an empty in-memory
//! cart can never overwrite stored state before the restore has read it.

use serde::Serialize;

/// Lifecycle phase of a cart store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartPhase {
    /// Created, nothing read from storage yet.
    #[default]
    Uninitialized,
    /// Reading persisted state.
    Restoring,
    /// Restored (possibly empty); writes enabled.
    Ready,
}

impl CartPhase {
    /// Whether persistence writes are allowed.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Restoring => "restoring",
            Self::Ready => "ready",
        }
    }
}

impl std::fmt::Display for CartPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
