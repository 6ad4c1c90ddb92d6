//! Commerce error types.
//!
//! Cart mutations never fail; these errors come from the edges around the
//! cart: extracting catalog products, pricing a checkout, building an order
//! and explicit persistence.

use thiserror::Error;

/// Errors that can occur in e-commerce operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// A required product field is absent.
    #[error("Missing product field: {0}")]
    MissingField(&'static str),

    /// A price could not be parsed or is negative.
    #[error("Invalid price in {field}: {value:?}")]
    InvalidPrice { field: &'static str, value: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Checkout incomplete.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistence error.
    #[error("Cache error: {0}")]
    Cache(#[from] aqpvet_cache::CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
