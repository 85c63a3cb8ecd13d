//! Cart commands against the local profile.
//!
//! # Usage
//!
//! ```bash
//! gb-cli cart add classic-black-hoodie --size L --qty 2
//! gb-cli cart update classic-black-hoodie:L 1
//! gb-cli cart remove classic-black-hoodie:L
//! gb-cli cart show --json
//! ```
//!
//! # Environment Variables
//!
//! - `GBONES_STORAGE_DIR` - Profile directory holding the cart file
//! - `GBONES_CART_STORAGE_KEY` - Storage key for the cart entry

use gbones_core::{LineItem, LineItemId, Money};
use gbones_storefront::cart::CartSummary;
use gbones_storefront::error::StorefrontError;
use gbones_storefront::state::AppState;

use super::CliError;

/// Options for `cart add`.
#[derive(Debug, Default)]
pub struct AddOptions {
    pub quantity: i64,
    pub variant: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub max_qty: Option<u32>,
    pub id: Option<String>,
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if the summary cannot be rendered as JSON.
#[allow(clippy::print_stdout)]
pub fn show(state: &AppState, json: bool) -> Result<(), CliError> {
    let summary = state.cart().summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary));
    }
    Ok(())
}

/// Look a product up in the catalog and add it to the cart.
///
/// # Errors
///
/// Returns an error if the product or variant does not exist, the explicit
/// id is blank, or the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn add(state: &AppState, slug: &str, options: AddOptions) -> Result<(), CliError> {
    let product = state.catalog().get(slug).await?;

    let mut candidate = match options.variant.as_deref() {
        Some(variant) => {
            product
                .variant_candidate(variant)
                .ok_or_else(|| {
                    StorefrontError::BadRequest(format!(
                        "product {slug} has no variant named {variant}"
                    ))
                })?
        }
        None => product.to_candidate(),
    };
    candidate.size = options.size;
    candidate.color = options.color;
    candidate.max_qty = options.max_qty;

    let explicit_id = options.id.as_deref().map(LineItemId::parse).transpose()?;

    let id = state.cart().add_item(candidate, options.quantity, explicit_id);
    state.cart().flush()?;

    let quantity = state.cart().item(&id).map_or(0, |item| item.quantity);
    println!("{id}: {quantity} in cart");
    Ok(())
}

/// Set a line's quantity. Zero or negative removes the line.
///
/// # Errors
///
/// Returns an error if the id is blank or the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub fn update(state: &AppState, id: &str, quantity: i64) -> Result<(), CliError> {
    let id = LineItemId::parse(id)?;
    if state.cart().update_qty(&id, quantity) {
        state.cart().flush()?;
        match state.cart().item(&id) {
            Some(item) => println!("{id}: {} in cart", item.quantity),
            None => println!("{id}: removed"),
        }
    } else {
        tracing::warn!(item_id = %id, "Line not in cart or quantity unchanged");
    }
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the id is blank or the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub fn remove(state: &AppState, id: &str) -> Result<(), CliError> {
    let id = LineItemId::parse(id)?;
    if state.cart().remove_item(&id) {
        state.cart().flush()?;
        println!("{id}: removed");
    } else {
        tracing::warn!(item_id = %id, "Line not in cart");
    }
    Ok(())
}

/// Remove every line.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub fn clear(state: &AppState) -> Result<(), CliError> {
    let removed = state.cart().items().len();
    state.cart().clear_cart();
    state.cart().flush()?;
    println!("Cleared {removed} line(s)");
    Ok(())
}

// =============================================================================
// Rendering
// =============================================================================

/// Lines and subtotal in the cart's currency. The subtotal takes the first
/// line's currency.
fn render_summary(summary: &CartSummary) -> String {
    let Some(first) = summary.items.first() else {
        return "Cart is empty\n".to_owned();
    };

    let mut out = String::new();
    for item in &summary.items {
        out.push_str(&render_line(item));
        out.push('\n');
    }
    out.push_str(&format!(
        "{} item(s), subtotal {}\n",
        summary.item_count,
        Money::from_cents(summary.subtotal_cents, &first.currency).display()
    ));
    out
}

fn render_line(item: &LineItem) -> String {
    let options: Vec<&str> = [&item.variant, &item.size, &item.color]
        .into_iter()
        .filter_map(Option::as_deref)
        .collect();

    let mut line = format!("{:>3} x {} [{}]", item.quantity, item.title, item.id);
    if !options.is_empty() {
        line.push_str(&format!(" ({})", options.join(" / ")));
    }
    let total = Money::from_cents(item.line_total_cents(), &item.currency);
    line.push_str(&format!("  {}", total.display()));
    line
}
