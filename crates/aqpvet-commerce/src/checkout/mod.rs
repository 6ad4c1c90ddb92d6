//! Checkout module.
//!
//! Contains the order summary, shipping details, order payload and the
//! checkout flow that clears the cart once an order is placed.

mod flow;
mod order;
mod summary;

pub use flow::{CheckoutFlow, CheckoutStep};
pub use order::{OrderDraft, OrderDraftItem, ShippingDetails};
pub use summary::CheckoutSummary;
