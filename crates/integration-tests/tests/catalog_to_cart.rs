//! Catalog lookups feeding the cart through the shared application state.

#![allow(clippy::unwrap_used)]

use gbones_core::{LineItemId, format_eur, format_eur_halved};
use gbones_integration_tests::TestProfile;
use gbones_storefront::catalog::CatalogError;
use gbones_storefront::state::AppState;

#[tokio::test]
async fn test_add_catalog_product_and_reopen() {
    let profile = TestProfile::new();
    let state = AppState::open(profile.config());

    let product = state.catalog().get("classic-black-hoodie").await.unwrap();
    let id = state
        .cart()
        .add_item(product.to_candidate().with_size("M"), 2, None);
    assert_eq!(id.as_str(), "classic-black-hoodie:M");
    state.cart().flush().unwrap();
    drop(state);

    let reopened = AppState::open(profile.config());
    let line = reopened.cart().item(&id).unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.price_cents, 7900);
    assert_eq!(
        line.image.as_deref(),
        Some(product.images[0].as_str())
    );
    assert_eq!(format_eur(reopened.cart().subtotal_cents()), "158,00 €");
}

#[tokio::test]
async fn test_default_variant_shares_base_line() {
    let profile = TestProfile::new();
    let state = AppState::open(profile.config());

    let product = state.catalog().get("minimalist-watch").await.unwrap();
    let base = state.cart().add(product.to_candidate());
    let via_variant = state
        .cart()
        .add(product.variant_candidate("default").unwrap());

    assert_eq!(base, via_variant);
    assert_eq!(state.cart().items().len(), 1);
    assert_eq!(state.cart().item_count(), 2);
}

#[tokio::test]
async fn test_explicit_id_keeps_separate_line() {
    let profile = TestProfile::new();
    let state = AppState::open(profile.config());

    let product = state.catalog().get("minimalist-white-tee").await.unwrap();
    state.cart().add(product.to_candidate());
    let gift = LineItemId::parse("minimalist-white-tee:gift").unwrap();
    state
        .cart()
        .add_item(product.to_candidate(), 1, Some(gift.clone()));

    assert_eq!(state.cart().items().len(), 2);
    assert!(state.cart().remove_item(&gift));
    assert_eq!(state.cart().items().len(), 1);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let profile = TestProfile::new();
    let state = AppState::open(profile.config());

    let err = state.catalog().get("no-such-product").await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(slug) if slug == "no-such-product"));
    assert!(state.cart().is_empty());
}

#[tokio::test]
async fn test_listing_prices_are_halved() {
    let profile = TestProfile::new();
    let state = AppState::open(profile.config());

    let accessories = state.catalog().category("accessories").await;
    assert_eq!(accessories.len(), 3);

    let bag = accessories
        .iter()
        .find(|product| product.slug == "leather-crossbody-bag")
        .unwrap();
    assert_eq!(bag.display_price(), format_eur_halved(15900));
    assert_eq!(bag.display_price(), "79,50 €");
}

#[tokio::test]
async fn test_search_then_clear_cart() {
    let profile = TestProfile::new();
    let state = AppState::open(profile.config());

    for product in state.catalog().search("minimalist").await {
        state.cart().add(product.to_candidate());
    }
    // Two names plus the hoodie's description
    assert_eq!(state.cart().item_count(), 3);

    state.cart().clear_cart();
    state.cart().flush().unwrap();

    let reopened = AppState::open(profile.config());
    assert!(reopened.cart().is_empty());
    assert_eq!(profile.raw_cart().as_deref(), Some("[]"));
}
