//! Gbones CLI - Local cart and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart stored in the local profile
//! gb-cli cart show
//!
//! # Add two of a catalog product in size M
//! gb-cli cart add minimalist-white-tee --qty 2 --size M
//!
//! # Set a line's quantity (0 or negative removes it)
//! gb-cli cart update minimalist-white-tee:M 5
//!
//! # Browse and search the development catalog
//! gb-cli catalog browse --first 3
//! gb-cli catalog search hoodie
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and modify the persisted cart
//! - `catalog` - Browse, get, search and list categories of products
//!
//! Every cart command restores the cart from the profile directory
//! (`GBONES_STORAGE_DIR`), applies the change, and flushes before exiting.
//! Logs go to stderr; set `RUST_LOG` to change the filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gbones_storefront::config::StorefrontConfig;
use gbones_storefront::error::StorefrontError;
use gbones_storefront::state::AppState;
use gbones_storefront::telemetry;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "gb-cli")]
#[command(author, version, about = "Gbones storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and modify the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Query the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart lines and totals
    Show {
        /// Print the cart summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a catalog product to the cart
    Add {
        /// Product slug
        slug: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i64,

        /// Product variant name
        #[arg(long)]
        variant: Option<String>,

        /// Size option
        #[arg(long)]
        size: Option<String>,

        /// Color option
        #[arg(long)]
        color: Option<String>,

        /// Maximum quantity allowed for this line
        #[arg(long)]
        max_qty: Option<u32>,

        /// Explicit line id instead of the derived one
        #[arg(long)]
        id: Option<String>,
    },
    /// Set the quantity of a line (0 or negative removes it)
    Update {
        /// Line id
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Remove a line
    Remove {
        /// Line id
        id: String,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List the first products
    Browse {
        /// Number of products to list
        #[arg(short, long, default_value_t = 10)]
        first: usize,
    },
    /// Show one product
    Get {
        /// Product slug
        slug: String,
    },
    /// Search product names and descriptions
    Search {
        /// Search text
        query: String,
    },
    /// List products in a category
    Category {
        /// Category slug (e.g., apparel, accessories)
        slug: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            telemetry::init_tracing(telemetry::DEFAULT_LOG_FILTER);
            StorefrontError::from(e).report();
            return ExitCode::FAILURE;
        }
    };

    // Dropped on return, flushing captured events
    let _sentry_guard = telemetry::init(&config);

    let state = AppState::open(config);

    exit_code(run(cli, &state).await)
}

/// Report a failed command and map the outcome to the process exit code.
fn exit_code(result: Result<(), CliError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, state: &AppState) -> Result<(), CliError> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show { json } => commands::cart::show(state, json)?,
            CartAction::Add {
                slug,
                qty,
                variant,
                size,
                color,
                max_qty,
                id,
            } => {
                let options = commands::cart::AddOptions {
                    quantity: qty,
                    variant,
                    size,
                    color,
                    max_qty,
                    id,
                };
                commands::cart::add(state, &slug, options).await?;
            }
            CartAction::Update { id, qty } => commands::cart::update(state, &id, qty)?,
            CartAction::Remove { id } => commands::cart::remove(state, &id)?,
            CartAction::Clear => commands::cart::clear(state)?,
        },
        Commands::Catalog { action } => match action {
            CatalogAction::Browse { first } => commands::catalog::browse(state, first).await,
            CatalogAction::Get { slug } => commands::catalog::get(state, &slug).await?,
            CatalogAction::Search { query } => commands::catalog::search(state, &query).await,
            CatalogAction::Category { slug } => commands::catalog::category(state, &slug).await,
        },
    }
    Ok(())
}
