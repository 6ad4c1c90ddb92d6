//! Shopping cart module.
//!
//! Contains the cart state, its change events and the store that owns it.

mod events;
mod state;
mod store;

pub use events::{CartEvent, CartObserver, SubscriptionId};
pub use state::{CartState, LineItem};
pub use store::{CartStore, PersistedCart, PERSISTED_CART_VERSION};
