//! Gbones Storefront library.
//!
//! The client-side state behind the storefront: the shopping cart with its
//! persistence to client-local storage, and the product catalog contract the
//! presentation shell reads from.
//!
//! # Modules
//!
//! - [`cart`] - Cart store: mutations, derived totals, debounced persistence
//! - [`storage`] - Client-local key-value storage backends
//! - [`catalog`] - Product catalog provider contract, mock provider, cache
//! - [`state`] - Application state injected at the root of the component tree
//! - [`config`] - Environment configuration
//! - [`telemetry`] - Tracing and Sentry setup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod telemetry;
