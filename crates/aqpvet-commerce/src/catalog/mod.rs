//! Catalog module.
//!
//! Catalog records arrive from the storefront API; the cart only ever keeps
//! the extracted [`ProductSnapshot`].

mod product;

pub use product::{CatalogProduct, PriceValue, ProductSnapshot};
