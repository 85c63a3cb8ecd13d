//! Cart store persistence against a file-backed profile.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use gbones_core::{ItemCandidate, LineItemId};
use gbones_integration_tests::{TEST_KEY, TestProfile, cart_config};
use gbones_storefront::cart::{CartPhase, CartStore, load_items};
use gbones_storefront::storage::FileStorage;
use serde_json::Value;

fn hoodie() -> ItemCandidate {
    ItemCandidate::new("classic-black-hoodie", "Classic Black Hoodie", 5999, "EUR")
        .with_image("https://images.unsplash.com/photo-1556821840-3a63f95609a7")
}

fn tee() -> ItemCandidate {
    ItemCandidate::new("minimalist-white-tee", "Minimalist White Tee", 2999, "EUR")
}

/// Let the debounce window elapse under a paused clock.
async fn past_debounce() {
    tokio::time::sleep(Duration::from_millis(600)).await;
}

// ============================================================================
// Round Trip
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_cart_survives_reopen() {
    let profile = TestProfile::new();

    let cart = CartStore::open(profile.storage(), cart_config());
    cart.add_item(hoodie().with_size("L"), 2, None);
    cart.add_item(tee(), 1, None);
    past_debounce().await;
    drop(cart);

    let reopened = CartStore::open(profile.storage(), cart_config());
    assert_eq!(reopened.item_count(), 3);
    assert_eq!(reopened.subtotal_cents(), 2 * 5999 + 2999);
    let ids: Vec<String> = reopened.items().iter().map(|item| item.id.to_string()).collect();
    assert_eq!(ids, ["classic-black-hoodie:L", "minimalist-white-tee"]);
}

#[tokio::test(start_paused = true)]
async fn test_persisted_layout_is_camel_case_array() {
    let profile = TestProfile::new();

    let cart = CartStore::open(profile.storage(), cart_config());
    cart.add_item(tee().with_size("M").with_max_qty(5), 2, None);
    past_debounce().await;

    let raw: Value = serde_json::from_str(&profile.raw_cart().unwrap()).unwrap();
    let line = &raw.as_array().unwrap()[0];
    assert_eq!(line["id"], "minimalist-white-tee:M");
    assert_eq!(line["priceCents"], 2999);
    assert_eq!(line["maxQty"], 5);
    assert_eq!(line["quantity"], 2);
    assert!(line.get("color").is_none());
    assert!(line.get("variant").is_none());
}

// ============================================================================
// Debounce
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_burst_of_mutations_writes_final_state() {
    let profile = TestProfile::new();
    let cart = CartStore::open(profile.storage(), cart_config());

    let id = cart.add(tee());
    for quantity in 2..=5 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cart.update_qty(&id, quantity);
    }

    // Still inside the window of the last mutation
    assert!(profile.raw_cart().is_none());
    assert!(cart.has_pending_write());

    past_debounce().await;
    let stored = load_items(&FileStorage::new(profile.path()), TEST_KEY).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].quantity, 5);
    assert!(!cart.has_pending_write());
}

#[tokio::test(start_paused = true)]
async fn test_flush_writes_without_waiting() {
    let profile = TestProfile::new();
    let cart = CartStore::open(profile.storage(), cart_config());

    cart.add(tee());
    cart.flush().unwrap();

    assert!(profile.raw_cart().is_some());
    assert!(!cart.has_pending_write());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_mutations_before_restore_do_not_overwrite_storage() {
    let profile = TestProfile::new();
    profile.write_raw_cart(
        r#"[{"id":"minimalist-white-tee","slug":"minimalist-white-tee","title":"Minimalist White Tee","priceCents":2999,"currency":"EUR","quantity":3}]"#,
    );

    let cart = CartStore::new(profile.storage(), cart_config());
    cart.add(hoodie());
    past_debounce().await;
    assert_eq!(cart.phase(), CartPhase::Uninitialized);

    // Restore replaces the in-memory collection with the stored one
    assert_eq!(cart.restore(), 1);
    assert_eq!(cart.item_count(), 3);
    assert!(cart.item(&LineItemId::parse("classic-black-hoodie").unwrap()).is_none());

    let stored = load_items(&FileStorage::new(profile.path()), TEST_KEY).unwrap();
    assert_eq!(stored[0].quantity, 3);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_store_cancels_pending_write() {
    let profile = TestProfile::new();

    let cart = CartStore::open(profile.storage(), cart_config());
    cart.add(tee());
    drop(cart);
    past_debounce().await;

    assert!(profile.raw_cart().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_keeps_last_written_state() {
    let profile = TestProfile::new();

    let cart = CartStore::open(profile.storage(), cart_config());
    let id = cart.add(tee());
    cart.flush().unwrap();
    cart.update_qty(&id, 4);
    cart.shutdown();
    past_debounce().await;

    let stored = load_items(&FileStorage::new(profile.path()), TEST_KEY).unwrap();
    assert_eq!(stored[0].quantity, 1);
}

// ============================================================================
// Failure Recovery
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_corrupted_payload_restores_empty() {
    let profile = TestProfile::new();
    profile.write_raw_cart("{not json");

    let cart = CartStore::open(profile.storage(), cart_config());
    assert!(cart.is_empty());
    assert_eq!(cart.phase(), CartPhase::Ready);

    cart.add(tee());
    cart.flush().unwrap();
    let reopened = CartStore::open(profile.storage(), cart_config());
    assert_eq!(reopened.item_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_non_array_payload_restores_empty() {
    let profile = TestProfile::new();
    profile.write_raw_cart(r#"{"items":[]}"#);

    let cart = CartStore::open(profile.storage(), cart_config());
    assert!(cart.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_quota_failure_keeps_memory_state() {
    let profile = TestProfile::new();
    let cart = CartStore::open(profile.storage_with_quota(64), cart_config());

    cart.add_item(hoodie(), 2, None);
    past_debounce().await;

    assert_eq!(cart.item_count(), 2);
    assert!(profile.raw_cart().is_none());
    assert!(cart.flush().is_err());
}
