//! Shipping details and the order payload built from the cart.

use crate::cart::CartState;
use crate::error::CommerceError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Where and to whom the order is shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    #[serde(rename = "shipping_name")]
    pub name: String,
    #[serde(rename = "shipping_email")]
    pub email: String,
    #[serde(rename = "shipping_phone")]
    pub phone: String,
    #[serde(rename = "shipping_address")]
    pub address: String,
    #[serde(rename = "shipping_city")]
    pub city: String,
}

impl ShippingDetails {
    /// Check that every field is filled in and the email looks like one.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(CommerceError::Validation(format!(
                "shipping {} is required",
                field
            )));
        }

        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(CommerceError::Validation(format!(
                "shipping email {:?} is not an email address",
                email
            ))),
        }
    }
}

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraftItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Order payload for the orders API.
///
/// Prices are not sent; the server reprices from its own catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(flatten)]
    pub shipping: ShippingDetails,
    pub items: Vec<OrderDraftItem>,
}

impl OrderDraft {
    /// Build the payload from the cart's line items.
    pub fn from_cart(cart: &CartState, shipping: ShippingDetails) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        shipping.validate()?;

        let items = cart
            .items()
            .iter()
            .map(|item| OrderDraftItem {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
            })
            .collect();

        Ok(Self { shipping, items })
    }

    /// Total units ordered.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Serialize the payload as pretty JSON.
    pub fn to_json(&self) -> Result<String, CommerceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
