//! Per-seller statistics gathered from the store.

pub mod aggregator;

pub use aggregator::{month_start_utc, Aggregator};
