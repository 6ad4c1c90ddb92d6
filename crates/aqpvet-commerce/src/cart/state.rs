//! Cart state and line item types.

use crate::cart::CartEvent;
use crate::catalog::ProductSnapshot;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A line item in the cart: one distinct product and its quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Catalog product ID.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Product description (denormalized for display).
    #[serde(default)]
    pub description: String,
    /// Product image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Price charged per unit (discounted price when the product had one).
    pub unit_price: Money,
    /// Catalog list price at the time the item was added.
    pub list_price: Money,
    /// Quantity, always at least 1.
    pub quantity: u32,
}

impl LineItem {
    fn from_snapshot(product: &ProductSnapshot, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            unit_price: product.unit_price(),
            list_price: product.price,
            quantity,
        }
    }

    /// `unit_price * quantity`.
    pub fn subtotal(&self) -> Money {
        self.unit_price.saturating_multiply(i64::from(self.quantity))
    }

    /// Check if the item is priced below its list price.
    pub fn is_discounted(&self) -> bool {
        self.unit_price != self.list_price
    }
}

/// The shopping cart contents.
///
/// Holds at most one line item per product and never a line item with a
/// zero quantity. Totals are computed from `items` on every read.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartState {
    currency: Currency,
    items: Vec<LineItem>,
}

impl CartState {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            items: Vec::new(),
        }
    }

    /// Rebuild a cart from previously stored items.
    ///
    /// Zero quantities are dropped, duplicate products are merged into the
    /// first occurrence, quantities are clamped to `max_quantity` and items
    /// priced in another currency are discarded. A `max_quantity` of 0 is
    /// treated as 1.
    pub fn from_items(
        currency: Currency,
        items: impl IntoIterator<Item = LineItem>,
        max_quantity: u32,
    ) -> Self {
        let max_quantity = max_quantity.max(1);
        let mut cart = Self::new(currency);
        for item in items {
            if item.quantity == 0 || item.unit_price.currency != currency {
                continue;
            }
            match cart.position(&item.product_id) {
                Some(index) => {
                    let existing = &mut cart.items[index];
                    existing.quantity = existing
                        .quantity
                        .saturating_add(item.quantity)
                        .min(max_quantity);
                }
                None => cart.items.push(LineItem {
                    quantity: item.quantity.min(max_quantity),
                    ..item
                }),
            }
        }
        cart
    }

    /// Currency every line item is priced in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get an item by product ID.
    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Total item count (sum of quantities).
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Total price (sum of `unit_price * quantity`).
    pub fn total_price(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(self.currency), |acc, item| {
                acc.saturating_add(&item.subtotal())
            })
    }

    pub(crate) fn add(
        &mut self,
        product: &ProductSnapshot,
        quantity: u32,
        max_quantity: u32,
    ) -> Option<CartEvent> {
        if quantity == 0 {
            return None;
        }
        let max_quantity = max_quantity.max(1);

        if let Some(index) = self.position(&product.id) {
            let item = &mut self.items[index];
            let from = item.quantity;
            let to = from.saturating_add(quantity).min(max_quantity).max(from);
            if to == from {
                return None;
            }
            item.quantity = to;
            return Some(CartEvent::QuantityChanged {
                product_id: product.id.clone(),
                from,
                to,
            });
        }

        let quantity = quantity.min(max_quantity);
        self.items.push(LineItem::from_snapshot(product, quantity));
        Some(CartEvent::ItemAdded {
            product_id: product.id.clone(),
            quantity,
        })
    }

    pub(crate) fn increase(&mut self, product_id: &ProductId, max_quantity: u32) -> Option<CartEvent> {
        let item = self.items.iter_mut().find(|i| &i.product_id == product_id)?;
        let from = item.quantity;
        if from >= max_quantity {
            return None;
        }
        item.quantity = from + 1;
        Some(CartEvent::QuantityChanged {
            product_id: product_id.clone(),
            from,
            to: from + 1,
        })
    }

    pub(crate) fn decrease(&mut self, product_id: &ProductId) -> Option<CartEvent> {
        let index = self.position(product_id)?;
        let from = self.items[index].quantity;
        if from <= 1 {
            self.items.remove(index);
            return Some(CartEvent::ItemRemoved {
                product_id: product_id.clone(),
            });
        }
        self.items[index].quantity = from - 1;
        Some(CartEvent::QuantityChanged {
            product_id: product_id.clone(),
            from,
            to: from - 1,
        })
    }

    pub(crate) fn remove(&mut self, product_id: &ProductId) -> Option<CartEvent> {
        let index = self.position(product_id)?;
        self.items.remove(index);
        Some(CartEvent::ItemRemoved {
            product_id: product_id.clone(),
        })
    }

    pub(crate) fn clear(&mut self) -> Option<CartEvent> {
        if self.items.is_empty() {
            return None;
        }
        let removed_items = self.items.len();
        self.items.clear();
        Some(CartEvent::Cleared { removed_items })
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items.iter().position(|i| &i.product_id == product_id)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}
