use serde::{Deserialize, Serialize};

use marketstat_infra::db::Pagination;

// -------------------------
// Request DTOs
// -------------------------

/// `?skip=&limit=` on list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    Pagination::DEFAULT_LIMIT
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl From<ListParams> for Pagination {
    fn from(p: ListParams) -> Self {
        Pagination::new(p.skip, p.limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct StatisticsRequest {
    pub email: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub const REPORT_ACCEPTED_MESSAGE: &str =
    "Report request accepted. The report will be sent to the provided email.";
