//! Checkout flow state machine.

use aqpvet_cache::KvStore;
use serde::{Deserialize, Serialize};

use crate::cart::{CartState, CartStore};
use crate::checkout::{OrderDraft, ShippingDetails};
use crate::ids::OrderId;
use crate::CommerceError;

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Shipping details form.
    #[default]
    Shipping,
    /// Payment and order submission.
    Payment,
    /// Order placed.
    Confirmed,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Confirmed => "confirmed",
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checkout flow state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    shipping: Option<ShippingDetails>,
    order_id: Option<OrderId>,
}

impl CheckoutFlow {
    /// Start a checkout at the shipping step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current step.
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn shipping(&self) -> Option<&ShippingDetails> {
        self.shipping.as_ref()
    }

    /// Order id recorded on confirmation.
    pub fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    /// Check if checkout is complete.
    pub fn is_complete(&self) -> bool {
        self.step() == CheckoutStep::Confirmed
    }

    /// Validate shipping details and move on to payment.
    ///
    /// Allowed from the shipping and payment steps, so details can be
    /// corrected before the order is placed.
    pub fn submit_shipping(&mut self, details: ShippingDetails) -> Result<CheckoutStep, CommerceError> {
        self.transition(CheckoutStep::Payment)?;
        details.validate()?;
        self.shipping = Some(details);
        self.step = CheckoutStep::Payment;
        Ok(CheckoutStep::Payment)
    }

    /// Go back from payment to the shipping form.
    pub fn back(&mut self) -> Result<CheckoutStep, CommerceError> {
        if self.step() != CheckoutStep::Payment {
            return Err(self.invalid(CheckoutStep::Shipping));
        }
        self.step = CheckoutStep::Shipping;
        Ok(CheckoutStep::Shipping)
    }

    /// Build the order payload for the current cart.
    pub fn order_draft(&self, cart: &CartState) -> Result<OrderDraft, CommerceError> {
        if self.step() != CheckoutStep::Payment {
            return Err(CommerceError::CheckoutIncomplete(format!(
                "order is only available at the payment step, currently at {}",
                self.step()
            )));
        }
        let shipping = self
            .shipping
            .clone()
            .ok_or_else(|| CommerceError::CheckoutIncomplete("shipping details".to_string()))?;
        OrderDraft::from_cart(cart, shipping)
    }

    /// Record a placed order and clear the cart.
    pub fn confirm<S: KvStore>(
        &mut self,
        order_id: OrderId,
        cart: &mut CartStore<S>,
    ) -> Result<(), CommerceError> {
        self.transition(CheckoutStep::Confirmed)?;
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        tracing::info!(
            order_id = %order_id,
            items = cart.total_items(),
            total = %cart.total_price(),
            "order confirmed"
        );
        self.order_id = Some(order_id);
        self.step = CheckoutStep::Confirmed;
        cart.clear();
        Ok(())
    }

    fn transition(&self, to: CheckoutStep) -> Result<(), CommerceError> {
        let allowed = match (self.step(), to) {
            (CheckoutStep::Shipping | CheckoutStep::Payment, CheckoutStep::Payment) => true,
            (CheckoutStep::Payment, CheckoutStep::Confirmed) => true,
            _ => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(self.invalid(to))
        }
    }

    fn invalid(&self, to: CheckoutStep) -> CommerceError {
        CommerceError::InvalidCheckoutTransition {
            from: self.step().as_str().to_string(),
            to: to.as_str().to_string(),
        }
    }
}
