use std::sync::Arc;

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use marketstat_reporting::{start_of_month, Clock, SellerStatistic};

use crate::db::{Pagination, ProductFilter, SaleFilter, Store, StoreError};

/// Computes one `SellerStatistic` per seller.
///
/// Every call scans the full seller table and issues three count queries per
/// seller. This is a low-frequency report, not a serving path.
#[derive(Clone)]
pub struct Aggregator {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl Aggregator {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Statistics for every seller, in store iteration order (ascending id).
    pub async fn compute_statistics(&self) -> Result<Vec<SellerStatistic>, StoreError> {
        let month_start = month_start_utc(self.clock.now());
        let sellers = self.store.list_sellers(Pagination::unbounded()).await?;

        let mut stats = Vec::with_capacity(sellers.len());
        for seller in sellers {
            let products_count = self
                .store
                .count_products(ProductFilter::by_seller(seller.id))
                .await?;
            let sales_count = self.store.count_sales(SaleFilter::by_seller(seller.id)).await?;
            let shipments_count_this_month = self
                .store
                .count_sales(SaleFilter::by_seller(seller.id).since(month_start))
                .await?;

            stats.push(SellerStatistic {
                seller_id: seller.id,
                seller_name: seller.name,
                products_count,
                sales_count,
                shipments_count_this_month,
            });
        }

        debug!(sellers = stats.len(), %month_start, "computed seller statistics");
        Ok(stats)
    }
}

impl core::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Aggregator").finish_non_exhaustive()
    }
}

/// Start of the current calendar month on the server's local clock, as a UTC
/// instant.
///
/// If local midnight on day 1 falls in a DST gap, the month starts at the
/// first local time that exists.
pub fn month_start_utc(now_local: NaiveDateTime) -> DateTime<Utc> {
    first_valid_instant(start_of_month(now_local), |local| {
        chrono::Local
            .from_local_datetime(local)
            .map(|t| t.with_timezone(&Utc))
    })
}

/// Longest run of nonexistent local times we step over.
const MAX_GAP_MINUTES: i64 = 24 * 60;

fn first_valid_instant<F>(local: NaiveDateTime, resolve: F) -> DateTime<Utc>
where
    F: Fn(&NaiveDateTime) -> LocalResult<DateTime<Utc>>,
{
    (0..=MAX_GAP_MINUTES)
        .find_map(|m| resolve(&(local + chrono::Duration::minutes(m))).earliest())
        .unwrap_or_else(|| Utc.from_utc_datetime(&local))
}
