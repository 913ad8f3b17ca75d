//! `marketstat-reporting`
//!
//! **Responsibility:** the pure half of the seller statistics report.
//!
//! - `SellerStatistic` is the derived, never-persisted row the aggregator
//!   produces for each seller.
//! - `Reporter` turns those rows into the plaintext document that gets mailed.
//! - `Clock` is the only source of wall-clock time, so both the report stamp
//!   and the "this month" boundary can be pinned in tests.
//!
//! Nothing here touches storage or the network.

pub mod clock;
pub mod report;
pub mod statistic;

pub use clock::{start_of_month, Clock, FixedClock, SystemClock};
pub use report::{Reporter, REPORT_SUBJECT};
pub use statistic::SellerStatistic;
