//! Catalog product types and the snapshot the cart stores.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A price as the catalog API sends it: a decimal string or a JSON number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PriceValue {
    Text(String),
    Number(f64),
}

impl PriceValue {
    fn to_money(&self, field: &'static str, currency: Currency) -> Result<Money, CommerceError> {
        let parsed = match self {
            PriceValue::Text(text) => Money::parse(text, currency),
            PriceValue::Number(n) if n.is_finite() => Some(Money::from_decimal(*n, currency)),
            PriceValue::Number(_) => None,
        };

        match parsed {
            Some(money) if !money.is_negative() => Ok(money),
            _ => Err(CommerceError::InvalidPrice {
                field,
                value: self.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PriceValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceValue::Text(text) => write!(f, "{}", text),
            PriceValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A product record as returned by the catalog API.
///
/// Every field is optional at this level and unknown fields are ignored;
/// [`ProductSnapshot::from_catalog`] decides what is actually required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogProduct {
    #[serde(default)]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// List price.
    #[serde(default)]
    pub price: Option<PriceValue>,
    /// Promotional price, when the product is on sale.
    #[serde(default)]
    pub discount_price: Option<PriceValue>,
    /// Server-computed `discount_price or price`.
    #[serde(default)]
    pub final_price: Option<PriceValue>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Uploaded image path, used when `image_url` is absent.
    #[serde(default)]
    pub image: Option<String>,
}

/// The product fields the cart keeps, extracted from a catalog record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    /// List price.
    pub price: Money,
    /// Discounted price; takes precedence over `price` when set.
    pub discount_price: Option<Money>,
}

impl ProductSnapshot {
    /// Create a snapshot with a list price only.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            image_url: None,
            price,
            discount_price: None,
        }
    }

    /// Set the discounted price.
    pub fn with_discount_price(mut self, discount_price: Money) -> Self {
        self.discount_price = Some(discount_price);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Extract a snapshot from a catalog record, pricing it in `currency`.
    ///
    /// `id`, `name` and `price` are required. A non-zero `discount_price`
    /// wins over `final_price`, which wins over `price`.
    pub fn from_catalog(raw: &CatalogProduct, currency: Currency) -> Result<Self, CommerceError> {
        let id = raw.id.clone().ok_or(CommerceError::MissingField("id"))?;
        let name = raw
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(CommerceError::MissingField("name"))?;
        let price = raw
            .price
            .as_ref()
            .ok_or(CommerceError::MissingField("price"))?
            .to_money("price", currency)?;

        // A zero discount is no discount.
        let discount = match &raw.discount_price {
            Some(discount) => Some(discount.to_money("discount_price", currency)?),
            None => None,
        };
        let discount_price = match (discount, &raw.final_price) {
            (Some(discount), _) if !discount.is_zero() => Some(discount),
            (_, Some(final_price)) => Some(final_price.to_money("final_price", currency)?)
                .filter(|p| *p != price && !p.is_zero()),
            (_, None) => None,
        };

        let image_url = [&raw.image_url, &raw.image]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            id,
            name: name.to_string(),
            description: raw.description.clone().unwrap_or_default(),
            image_url,
            price,
            discount_price,
        })
    }

    /// Extract a snapshot from a raw JSON product object.
    pub fn from_json(value: &serde_json::Value, currency: Currency) -> Result<Self, CommerceError> {
        let raw: CatalogProduct = serde_json::from_value(value.clone())?;
        Self::from_catalog(&raw, currency)
    }

    /// The price a shopper pays per unit.
    pub fn unit_price(&self) -> Money {
        self.discount_price.unwrap_or(self.price)
    }

    /// Check if the product is on sale.
    pub fn is_discounted(&self) -> bool {
        self.discount_price.is_some()
    }
}
