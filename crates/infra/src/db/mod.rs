//! Relational persistence for sellers, products and sales.
//!
//! `Store` is the seam the HTTP layer and the statistics aggregator depend on;
//! `SqliteStore` is the only backend.

pub mod query;
pub mod sqlite;
pub mod store;

pub use query::{Pagination, ProductFilter, SaleFilter};
pub use sqlite::SqliteStore;
pub use store::{Store, StoreError};
