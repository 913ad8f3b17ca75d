use thiserror::Error;

use marketstat_core::{ProductId, SaleId, SellerId};
use marketstat_products::{NewProduct, Product};
use marketstat_sales::{NewSale, Sale};
use marketstat_sellers::{NewSeller, Seller};

use super::query::{Pagination, ProductFilter, SaleFilter};

/// Persistence failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A constraint rejected the write (e.g. duplicate seller email).
    #[error("constraint violation during {operation}: {message}")]
    Conflict {
        operation: &'static str,
        message: String,
    },

    /// Connectivity, schema, or decoding failure.
    #[error("store failure during {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Create/list/get plus the aggregate counts used by the statistics report.
///
/// Every write is a single insert; nothing here coordinates multi-row
/// transactions. Inputs are expected to be validated already.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn create_seller(&self, seller: &NewSeller) -> Result<Seller, StoreError>;
    async fn list_sellers(&self, page: Pagination) -> Result<Vec<Seller>, StoreError>;
    async fn get_seller(&self, id: SellerId) -> Result<Option<Seller>, StoreError>;

    async fn create_product(&self, product: &NewProduct) -> Result<Product, StoreError>;
    async fn list_products(&self, page: Pagination) -> Result<Vec<Product>, StoreError>;
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn create_sale(&self, sale: &NewSale) -> Result<Sale, StoreError>;
    async fn list_sales(&self, page: Pagination) -> Result<Vec<Sale>, StoreError>;
    async fn get_sale(&self, id: SaleId) -> Result<Option<Sale>, StoreError>;

    async fn count_products(&self, filter: ProductFilter) -> Result<u64, StoreError>;
    async fn count_sales(&self, filter: SaleFilter) -> Result<u64, StoreError>;
}
