//! Cart and pricing configuration.

use aqpvet_cache::cache_key;
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::money::{Currency, Money};

/// Prefix for cart storage keys.
pub const STORAGE_KEY_PREFIX: &str = "aqpvet-cart";

/// Default cap on a single line item's quantity.
pub const DEFAULT_MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// Configuration for a [`CartStore`](crate::cart::CartStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Storage namespace (e.g. "guest" or a user id).
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Currency every line item is priced in.
    #[serde(default)]
    pub currency: Currency,

    /// Quantities above this are clamped.
    #[serde(default = "default_max_quantity")]
    pub max_quantity_per_item: u32,

    /// Checkout pricing.
    #[serde(default)]
    pub pricing: PricingConfig,
}

fn default_namespace() -> String {
    "guest".to_string()
}

fn default_max_quantity() -> u32 {
    DEFAULT_MAX_QUANTITY_PER_ITEM
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            currency: Currency::default(),
            max_quantity_per_item: default_max_quantity(),
            pricing: PricingConfig::default(),
        }
    }
}

impl CartConfig {
    /// Config for a specific storage namespace.
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Key under which the cart snapshot is persisted.
    pub fn storage_key(&self) -> String {
        cache_key!(STORAGE_KEY_PREFIX, self.namespace)
    }

    /// Check the configuration for values the cart cannot work with.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.namespace.trim().is_empty() {
            return Err(CommerceError::Validation(
                "cart.namespace must not be empty".to_string(),
            ));
        }
        if self.max_quantity_per_item == 0 {
            return Err(CommerceError::Validation(
                "cart.max_quantity_per_item must be at least 1".to_string(),
            ));
        }
        self.pricing.validate(self.currency)
    }
}

/// Checkout pricing rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Sales tax applied on the subtotal, in percent.
    #[serde(default = "default_tax_rate")]
    pub tax_rate_percent: f64,

    /// Flat shipping fee as a decimal string.
    #[serde(default = "default_shipping")]
    pub shipping_flat: String,
}

fn default_tax_rate() -> f64 {
    18.0
}

fn default_shipping() -> String {
    "0.00".to_string()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate_percent: default_tax_rate(),
            shipping_flat: default_shipping(),
        }
    }
}

impl PricingConfig {
    /// Parse the flat shipping fee in the given currency.
    pub fn shipping_cost(&self, currency: Currency) -> Result<Money, CommerceError> {
        match Money::parse(&self.shipping_flat, currency) {
            Some(cost) if !cost.is_negative() => Ok(cost),
            _ => Err(CommerceError::InvalidPrice {
                field: "pricing.shipping_flat",
                value: self.shipping_flat.clone(),
            }),
        }
    }

    fn validate(&self, currency: Currency) -> Result<(), CommerceError> {
        if !(0.0..=100.0).contains(&self.tax_rate_percent) {
            return Err(CommerceError::Validation(format!(
                "pricing.tax_rate_percent must be within 0-100, got {}",
                self.tax_rate_percent
            )));
        }
        self.shipping_cost(currency).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key(), "aqpvet-cart:guest");
        assert_eq!(config.currency, Currency::PEN);
        assert_eq!(config.max_quantity_per_item, 9999);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: CartConfig = serde_json::from_str(r#"{"namespace":"user-12"}"#).unwrap();
        assert_eq!(config.storage_key(), "aqpvet-cart:user-12");
        assert_eq!(config.pricing, PricingConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CartConfig::for_namespace(" ");
        assert!(config.validate().is_err());

        config = CartConfig::default();
        config.max_quantity_per_item = 0;
        assert!(config.validate().is_err());

        config = CartConfig::default();
        config.pricing.tax_rate_percent = 120.0;
        assert!(config.validate().is_err());

        config = CartConfig::default();
        config.pricing.shipping_flat = "-5".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shipping_cost() {
        let pricing = PricingConfig {
            shipping_flat: "12.50".to_string(),
            ..PricingConfig::default()
        };
        assert_eq!(pricing.shipping_cost(Currency::PEN).unwrap().amount_cents, 1250);
    }
}
