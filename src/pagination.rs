//! List pagination
//!
//! Every collection endpoint takes the same `?page=&limit=` query pair and
//! answers with a `pagination` block. Out-of-range values are rejected with
//! 400 rather than silently clamped.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Query parameters accepted by list endpoints. `status` and `role` are
/// optional filters; each endpoint parses the one it understands.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub role: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Number of records to skip before the requested page starts
    pub fn offset(&self) -> usize {
        ((self.page() - 1) * self.limit()) as usize
    }
}

/// Pagination block returned alongside every collection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(total: u64, query: &ListQuery) -> Self {
        let limit = query.limit();
        Self {
            total,
            page: query.page(),
            limit,
            total_pages: total.div_ceil(u64::from(limit)) as u32,
        }
    }
}
