use marketstat_core::SellerId;

/// Per-seller counts for one report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerStatistic {
    pub seller_id: SellerId,
    pub seller_name: String,
    pub products_count: u64,
    pub sales_count: u64,
    /// Sales dated on or after the first instant of the current month.
    /// Always `<= sales_count`.
    pub shipments_count_this_month: u64,
}

impl SellerStatistic {
    pub fn is_consistent(&self) -> bool {
        self.shipments_count_this_month <= self.sales_count
    }
}
