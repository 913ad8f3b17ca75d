//! `marketstat-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod email;
pub mod entity;
pub mod error;
pub mod id;

pub use email::{is_valid_email, validate_email};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ProductId, SaleId, SellerId};
