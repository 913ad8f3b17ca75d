//! Sales domain module.
//!
//! A sale records a quantity of one product sold at a point in time.

pub mod sale;

pub use sale::{parse_sale_date, NewSale, Sale};
