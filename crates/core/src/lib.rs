//! Gbones Core - Shared types library.
//!
//! This crate provides common types used across all Gbones components:
//! - `storefront` - Cart store, local storage backends and catalog contract
//! - `cli` - Command-line tools for driving the cart and browsing the catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no timers,
//! no storage access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Line items, identity keys, and money formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
