//! Sellers domain module.
//!
//! Business rules for marketplace sellers, implemented as pure validation
//! (no IO, no HTTP, no storage).

pub mod seller;

pub use seller::{NewSeller, Seller};
