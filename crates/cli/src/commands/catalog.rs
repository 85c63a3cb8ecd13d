//! Catalog browsing commands.
//!
//! Reads from the development catalog. `GBONES_CATALOG_LATENCY_MS` sets the
//! simulated provider latency (0 disables it).

use gbones_storefront::catalog::{Product, ProductPage};
use gbones_storefront::state::AppState;

use super::CliError;

/// List the first `first` products.
#[allow(clippy::print_stdout)]
pub async fn browse(state: &AppState, first: usize) {
    let ProductPage {
        products,
        has_next_page,
    } = state.catalog().browse(first).await;

    print_products(&products);
    if has_next_page {
        println!("(more products available)");
    }
}

/// Show one product with its variants.
///
/// # Errors
///
/// Returns an error if no product has this slug.
#[allow(clippy::print_stdout)]
pub async fn get(state: &AppState, slug: &str) -> Result<(), CliError> {
    let product = state.catalog().get(slug).await?;

    println!("{} [{}]", product.name, product.slug);
    println!("{}", product.display_price());
    if let Some(category) = &product.category {
        println!("Category: {category}");
    }
    println!();
    println!("{}", product.description);

    if !product.variants.is_empty() {
        println!();
        println!("Variants:");
        for variant in &product.variants {
            println!(
                "  {} ({})",
                variant.name,
                gbones_core::format_eur_halved(variant.price_cents)
            );
        }
    }
    Ok(())
}

/// Search product names and descriptions.
#[allow(clippy::print_stdout)]
pub async fn search(state: &AppState, query: &str) {
    let products = state.catalog().search(query).await;
    if products.is_empty() {
        println!("No products match \"{query}\"");
    } else {
        print_products(&products);
    }
}

/// List products in a category.
#[allow(clippy::print_stdout)]
pub async fn category(state: &AppState, slug: &str) {
    let products = state.catalog().category(slug).await;
    if products.is_empty() {
        println!("No products in category {slug}");
    } else {
        print_products(&products);
    }
}

#[allow(clippy::print_stdout)]
fn print_products(products: &[Product]) {
    for product in products {
        println!("{}", product_row(product));
    }
}

fn product_row(product: &Product) -> String {
    format!(
        "{:<28} {:<24} {:>10}",
        product.slug,
        product.name,
        product.display_price()
    )
}
