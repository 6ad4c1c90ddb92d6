//! Checkout commands.

use anyhow::{bail, Context as _, Result};
use aqpvet_commerce::prelude::*;
use dialoguer::Confirm;

use super::{needs_prompt, CheckoutArgs, CheckoutCommand};
use crate::context::Context;

/// Run the checkout command.
pub fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CheckoutCommand::Summary => summary(ctx),
        CheckoutCommand::Order {
            name,
            email,
            phone,
            address,
            city,
            confirm,
            yes,
        } => {
            let details = ShippingDetails {
                name,
                email,
                phone,
                address,
                city,
            };
            order(details, confirm, yes, ctx)
        }
    }
}

fn summary(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let summary = CheckoutSummary::from_cart(cart.state(), &cart.config().pricing)?;

    if ctx.output.is_json() {
        ctx.output.json(&summary);
        return Ok(());
    }

    ctx.output.header("Order summary");
    let shipping = if summary.has_free_shipping() {
        "Free".to_string()
    } else {
        summary.shipping.display()
    };
    ctx.output.totals(&[
        ("Items", summary.total_items.to_string()),
        ("Subtotal", summary.subtotal.display()),
        (&format!("Tax ({}%)", summary.tax_rate_percent), summary.tax.display()),
        ("Shipping", shipping),
        ("Total", summary.total.display()),
    ]);

    Ok(())
}

fn order(details: ShippingDetails, confirm: Option<String>, yes: bool, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    if cart.is_empty() {
        bail!("Cart is empty, add products before checking out");
    }

    let mut flow = CheckoutFlow::new();
    flow.submit_shipping(details)?;
    let draft = flow.order_draft(cart.state())?;

    if ctx.output.is_json() {
        ctx.output.json(&draft);
    } else {
        ctx.output.header("Order payload");
        println!("{}", draft.to_json()?);
    }

    let Some(order_id) = confirm else {
        return Ok(());
    };

    if needs_prompt(yes, ctx.output.is_json())? {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Mark order {} as placed and clear the cart?",
                order_id
            ))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Order not confirmed");
            return Ok(());
        }
    }

    flow.confirm(OrderId::new(order_id), &mut cart)?;
    cart.flush().context("Failed to save cart")?;

    if let Some(id) = flow.order_id() {
        ctx.output.success(&format!("Order {} confirmed, cart cleared", id));
    }
    Ok(())
}
