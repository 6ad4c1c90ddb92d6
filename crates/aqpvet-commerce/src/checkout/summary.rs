//! Order summary shown on the checkout page.

use crate::cart::CartState;
use crate::config::PricingConfig;
use crate::error::CommerceError;
use crate::money::Money;
use serde::Serialize;

/// Totals for the checkout page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutSummary {
    /// Number of units in the cart.
    pub total_items: u64,
    /// Cart total before tax and shipping.
    pub subtotal: Money,
    /// Tax rate applied, in percent.
    pub tax_rate_percent: f64,
    pub tax: Money,
    pub shipping: Money,
    /// `subtotal + tax + shipping`.
    pub total: Money,
}

impl CheckoutSummary {
    /// Price the current cart.
    pub fn from_cart(cart: &CartState, pricing: &PricingConfig) -> Result<Self, CommerceError> {
        let subtotal = cart.total_price();
        let tax = subtotal.percentage(pricing.tax_rate_percent);
        let shipping = pricing.shipping_cost(cart.currency())?;
        let total = subtotal
            .try_add(&tax)
            .and_then(|t| t.try_add(&shipping))
            .ok_or(CommerceError::Overflow)?;

        Ok(Self {
            total_items: cart.total_items(),
            subtotal,
            tax_rate_percent: pricing.tax_rate_percent,
            tax,
            shipping,
            total,
        })
    }

    /// Check if shipping is free.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductSnapshot;
    use crate::money::Currency;

    #[test]
    fn test_default_pricing() {
        let mut cart = CartState::default();
        cart.add(
            &ProductSnapshot::new(1, "Kibble", Money::new(5000, Currency::PEN)),
            2,
            10,
        );

        let summary = CheckoutSummary::from_cart(&cart, &PricingConfig::default()).unwrap();
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.subtotal.amount_cents, 10000);
        assert_eq!(summary.tax.amount_cents, 1800);
        assert!(summary.has_free_shipping());
        assert_eq!(summary.total.amount_cents, 11800);
    }

    #[test]
    fn test_flat_shipping_and_rounding() {
        let mut cart = CartState::default();
        cart.add(
            &ProductSnapshot::new(1, "Collar", Money::new(999, Currency::PEN)),
            1,
            10,
        );
        let pricing = PricingConfig {
            tax_rate_percent: 18.0,
            shipping_flat: "10.00".to_string(),
        };

        let summary = CheckoutSummary::from_cart(&cart, &pricing).unwrap();
        // 9.99 * 18% = 1.7982
        assert_eq!(summary.tax.amount_cents, 180);
        assert_eq!(summary.total.amount_cents, 999 + 180 + 1000);
    }

    #[test]
    fn test_empty_cart_is_zero() {
        let summary =
            CheckoutSummary::from_cart(&CartState::default(), &PricingConfig::default()).unwrap();
        assert!(summary.total.is_zero());
    }
}
