use serde::{Deserialize, Serialize};

use marketstat_core::{DomainError, DomainResult, Entity, ProductId, SellerId};

/// A persisted product. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    /// Owning seller. Not enforced as a foreign key.
    pub seller_id: SellerId,
}

impl Entity for Product {
    type Id = ProductId;

    const KIND: &'static str = "Product";

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub seller_id: SellerId,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation("price must be a non-negative number"));
        }
        Ok(())
    }
}
