//! Plaintext rendering of seller statistics.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::statistic::SellerStatistic;

/// Subject line used when the report is mailed.
pub const REPORT_SUBJECT: &str = "Seller statistics";

const TITLE: &str = "Seller statistics";
const SEPARATOR_WIDTH: usize = 30;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders statistics into the report body.
///
/// Output is a pure function of the input rows and the injected clock.
#[derive(Clone)]
pub struct Reporter {
    clock: Arc<dyn Clock>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Reporter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn render(&self, stats: &[SellerStatistic]) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(4 + stats.len() * 5);
        lines.push(TITLE.to_string());
        lines.push("=".repeat(SEPARATOR_WIDTH));
        lines.push(String::new());

        for stat in stats {
            lines.push(format!("Seller: {} (ID: {})", stat.seller_name, stat.seller_id));
            lines.push(format!("- Products: {}", stat.products_count));
            lines.push(format!("- Total sales: {}", stat.sales_count));
            lines.push(format!("- Shipments this month: {}", stat.shipments_count_this_month));
            lines.push(String::new());
        }

        lines.push(format!(
            "Report generated: {}",
            self.clock.now().format(TIMESTAMP_FORMAT)
        ));
        lines.join("\n")
    }
}

impl core::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}
