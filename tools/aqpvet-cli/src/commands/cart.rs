//! Cart commands.

use std::io::Read;

use anyhow::{bail, Context as _, Result};
use aqpvet_cache::KvStore;
use aqpvet_commerce::prelude::*;
use dialoguer::Confirm;
use serde::Serialize;

use super::{needs_prompt, CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {
            show_cart(&cart, ctx);
            return Ok(());
        }
        CartCommand::Add {
            id,
            name,
            price,
            discount_price,
            description,
            image_url,
            qty,
        } => {
            let raw = CatalogProduct {
                id: Some(ProductId::new(id)),
                name: Some(name),
                description,
                price: Some(PriceValue::Text(price)),
                discount_price: discount_price.map(PriceValue::Text),
                final_price: None,
                image_url,
                image: None,
            };
            let product = ProductSnapshot::from_catalog(&raw, cart.currency())?;
            add(&mut cart, &product, qty, ctx);
        }
        CartCommand::Import { file, qty } => {
            let products = read_products(&file, cart.currency())?;
            for product in &products {
                add(&mut cart, product, qty, ctx);
            }
        }
        CartCommand::Inc { id } => {
            let id = ProductId::new(id);
            if cart.increase_item(&id) {
                report_quantity(&cart, &id, ctx);
            } else if cart.get(&id).is_some() {
                ctx.output.warn(&format!(
                    "{} is already at the maximum quantity",
                    id
                ));
            } else {
                ctx.output.warn(&format!("{} is not in the cart", id));
            }
        }
        CartCommand::Dec { id } => {
            let id = ProductId::new(id);
            if cart.decrease_item(&id) {
                report_quantity(&cart, &id, ctx);
            } else {
                ctx.output.warn(&format!("{} is not in the cart", id));
            }
        }
        CartCommand::Remove { id } => {
            let id = ProductId::new(id);
            if cart.remove_item(&id) {
                ctx.output.success(&format!("Removed {}", id));
            } else {
                ctx.output.warn(&format!("{} is not in the cart", id));
            }
        }
        CartCommand::Clear { yes } => {
            if cart.is_empty() {
                ctx.output.info("Cart is already empty");
            } else {
                if needs_prompt(yes, ctx.output.is_json())? {
                    let confirmed = Confirm::new()
                        .with_prompt(format!("Remove all {} item(s)?", cart.total_items()))
                        .default(false)
                        .interact()?;
                    if !confirmed {
                        ctx.output.warn("Cancelled");
                        return Ok(());
                    }
                }
                cart.clear();
                ctx.output.success("Cart cleared");
            }
        }
    }

    cart.flush().context("Failed to save cart")?;
    show_cart(&cart, ctx);
    Ok(())
}

fn add<S: KvStore>(cart: &mut CartStore<S>, product: &ProductSnapshot, qty: u32, ctx: &Context) {
    if cart.add_item(product, qty) {
        report_quantity(cart, &product.id, ctx);
    } else {
        ctx.output
            .warn(&format!("{} ({}) was not added", product.name, product.id));
    }
}

fn report_quantity<S: KvStore>(cart: &CartStore<S>, id: &ProductId, ctx: &Context) {
    match cart.get(id) {
        Some(item) => ctx
            .output
            .success(&format!("{} x{}", item.name, item.quantity)),
        None => ctx.output.success(&format!("Removed {}", id)),
    }
}

/// Read catalog products from a file or stdin.
///
/// Accepts a single product object, an array of products, or a paginated
/// response with a `results` array.
fn read_products(file: &str, currency: Currency) -> Result<Vec<ProductSnapshot>> {
    let content = if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))?
    };

    let value: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", file))?;

    let records = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("results") {
            Some(serde_json::Value::Array(items)) => items,
            _ => vec![serde_json::Value::Object(map)],
        },
        _ => bail!("Expected a product object or a list of products in {}", file),
    };

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            ProductSnapshot::from_json(record, currency)
                .with_context(|| format!("Product #{} in {}", i + 1, file))
        })
        .collect()
}

#[derive(Serialize)]
struct CartView<'a> {
    #[serde(flatten)]
    state: &'a CartState,
    total_items: u64,
    total_price: String,
    last_saved: Option<String>,
}

fn show_cart<S: KvStore>(cart: &CartStore<S>, ctx: &Context) {
    let last_saved = cart.last_saved().map(|t| {
        t.with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    });

    if ctx.output.is_json() {
        ctx.output.json(&CartView {
            state: cart.state(),
            total_items: cart.total_items(),
            total_price: cart.total_price().display(),
            last_saved,
        });
        return;
    }

    ctx.output.header(&format!("Cart ({})", cart.config().namespace));
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    ctx.output.line_items(cart.items());
    println!();
    ctx.output.totals(&[
        ("Items", cart.total_items().to_string()),
        ("Total", cart.total_price().display()),
    ]);
    if let Some(saved) = last_saved {
        ctx.output.kv("Saved", &saved);
    }
}
