//! Shopping cart domain for the AqpVet pet store.
//!
//! - **Catalog**: extracting the fields the cart keeps from catalog records
//! - **Cart**: the shared [`CartStore`](cart::CartStore), its line items,
//!   derived totals, persistence and change observers
//! - **Checkout**: order summary, shipping details, order payload and the
//!   flow that clears the cart once an order is placed
//!
//! # Example
//!
//! ```rust
//! use aqpvet_cache::MemoryStore;
//! use aqpvet_commerce::prelude::*;
//! use serde_json::json;
//!
//! let mut cart = CartStore::open(MemoryStore::new(), CartConfig::default());
//!
//! let raw = json!({"id": 12, "name": "Collar", "price": "25.00", "discount_price": "19.90"});
//! let collar = ProductSnapshot::from_json(&raw, cart.currency())?;
//!
//! cart.add_one(&collar);
//! cart.increase_item(&collar.id);
//!
//! let summary = CheckoutSummary::from_cart(cart.state(), &cart.config().pricing)?;
//! assert_eq!(summary.subtotal.display(), "S/ 39.80");
//! # Ok::<(), CommerceError>(())
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod config;

pub mod catalog;
pub mod cart;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::config::{CartConfig, PricingConfig};

    // Catalog
    pub use crate::catalog::{CatalogProduct, PriceValue, ProductSnapshot};

    // Cart
    pub use crate::cart::{
        CartEvent, CartObserver, CartState, CartStore, LineItem, PersistedCart, SubscriptionId,
    };

    // Checkout
    pub use crate::checkout::{
        CheckoutFlow, CheckoutStep, CheckoutSummary, OrderDraft, OrderDraftItem, ShippingDetails,
    };
}
