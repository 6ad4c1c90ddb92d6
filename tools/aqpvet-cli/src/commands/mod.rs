//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

/// Whether a destructive command should ask before acting.
///
/// JSON mode cannot prompt, so it requires `--yes`.
pub fn needs_prompt(yes: bool, json: bool) -> Result<bool> {
    match (yes, json) {
        (true, _) => Ok(false),
        (false, true) => bail!("Refusing to change the cart in --json mode without --yes"),
        (false, false) => Ok(true),
    }
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart contents and totals.
    Show,
    /// Add a product described on the command line.
    Add {
        /// Product ID.
        #[arg(long)]
        id: String,
        /// Product name.
        #[arg(long)]
        name: String,
        /// List price (e.g. 49.90).
        #[arg(long)]
        price: String,
        /// Discounted price.
        #[arg(long)]
        discount_price: Option<String>,
        /// Product description.
        #[arg(long)]
        description: Option<String>,
        /// Product image URL.
        #[arg(long)]
        image_url: Option<String>,
        /// Units to add.
        #[arg(short, long, default_value = "1")]
        qty: u32,
    },
    /// Add products from catalog JSON (a product, a list or a page of results).
    Import {
        /// JSON file, or `-` for stdin.
        file: String,
        /// Units to add of each product.
        #[arg(short, long, default_value = "1")]
        qty: u32,
    },
    /// Add one unit of a product already in the cart.
    Inc {
        /// Product ID.
        id: String,
    },
    /// Remove one unit of a product.
    Dec {
        /// Product ID.
        id: String,
    },
    /// Remove a product regardless of quantity.
    Remove {
        /// Product ID.
        id: String,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    #[command(subcommand)]
    pub command: CheckoutCommand,
}

#[derive(Subcommand)]
pub enum CheckoutCommand {
    /// Show subtotal, tax, shipping and total.
    Summary,
    /// Build the order payload, optionally confirming the order.
    Order {
        /// Recipient name.
        #[arg(long)]
        name: String,
        /// Contact email.
        #[arg(long)]
        email: String,
        /// Contact phone.
        #[arg(long)]
        phone: String,
        /// Street address.
        #[arg(long)]
        address: String,
        /// City.
        #[arg(long)]
        city: String,
        /// Mark the order as placed with this ID and clear the cart.
        #[arg(long, value_name = "ORDER_ID")]
        confirm: Option<String>,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Cart storage namespace.
        #[arg(short, long, default_value = "guest")]
        namespace: String,
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
