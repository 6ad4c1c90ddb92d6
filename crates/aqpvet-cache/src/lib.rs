//! Type-safe key-value persistence for the aqpvet storefront.
//!
//! Provides a simple, ergonomic API for persisting data in a key-value
//! backend with automatic JSON serialization. Backends implement
//! [`KvStore`]; [`Cache`] adds typed access on top.
//!
//! # Example
//!
//! ```
//! use aqpvet_cache::{Cache, MemoryStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Cart {
//!     items: Vec<String>,
//! }
//!
//! let cache = Cache::new(MemoryStore::new());
//!
//! cache.set("cart:guest", &Cart { items: vec!["kibble".into()] }).unwrap();
//! let cart: Option<Cart> = cache.get("cart:guest").unwrap();
//! assert_eq!(cart.unwrap().items.len(), 1);
//!
//! cache.delete("cart:guest").unwrap();
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, KvStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use store::SpinStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
