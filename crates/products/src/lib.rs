//! Products domain module.
//!
//! Business rules for the product catalog, implemented as pure validation
//! (no IO, no HTTP, no storage).

pub mod product;

pub use product::{NewProduct, Product};
