//! Change notifications published by the cart store.

use crate::cart::CartState;
use crate::ids::ProductId;
use serde::Serialize;

/// A committed change to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    /// A new line item was inserted.
    ItemAdded { product_id: ProductId, quantity: u32 },
    /// An existing line item's quantity changed.
    QuantityChanged {
        product_id: ProductId,
        from: u32,
        to: u32,
    },
    /// A line item was deleted.
    ItemRemoved { product_id: ProductId },
    /// Every line item was deleted.
    Cleared { removed_items: usize },
}

impl CartEvent {
    /// The product this event concerns, if it concerns a single one.
    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            CartEvent::ItemAdded { product_id, .. }
            | CartEvent::QuantityChanged { product_id, .. }
            | CartEvent::ItemRemoved { product_id } => Some(product_id),
            CartEvent::Cleared { .. } => None,
        }
    }
}

/// Receives cart changes after they are committed and persisted.
///
/// Observers re-read whatever derived state they display from `cart`.
/// Closures of the form `FnMut(&CartEvent, &CartState)` are observers.
pub trait CartObserver {
    fn on_change(&mut self, event: &CartEvent, cart: &CartState);
}

impl<F> CartObserver for F
where
    F: FnMut(&CartEvent, &CartState),
{
    fn on_change(&mut self, event: &CartEvent, cart: &CartState) {
        self(event, cart)
    }
}

/// Handle returned by [`CartStore::subscribe`](crate::cart::CartStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
