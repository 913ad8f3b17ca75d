use chrono::{DateTime, Utc};

use marketstat_core::SellerId;

/// Offset/limit pagination for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u64 = 100;

    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Every row; used by full-table scans such as the statistics report.
    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: i64::MAX as u64,
        }
    }

    pub(crate) fn sql_limit(&self) -> i64 {
        self.limit.min(i64::MAX as u64) as i64
    }

    pub(crate) fn sql_offset(&self) -> i64 {
        self.offset.min(i64::MAX as u64) as i64
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Filter for counting products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub seller_id: Option<SellerId>,
}

impl ProductFilter {
    pub fn by_seller(seller_id: SellerId) -> Self {
        Self {
            seller_id: Some(seller_id),
        }
    }
}

/// Filter for counting sales. Seller ownership is resolved by joining each
/// sale to its product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleFilter {
    pub seller_id: Option<SellerId>,
    /// Inclusive lower bound on `sale_date`.
    pub sold_since: Option<DateTime<Utc>>,
}

impl SaleFilter {
    pub fn by_seller(seller_id: SellerId) -> Self {
        Self {
            seller_id: Some(seller_id),
            sold_since: None,
        }
    }

    pub fn since(mut self, at: DateTime<Utc>) -> Self {
        self.sold_since = Some(at);
        self
    }
}
