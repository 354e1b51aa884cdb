//! Pagination helpers shared by the service layer.

use crate::types::PageInfo;

/// Pagination parameters as received from the query string.
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to 0-based `(page_index, per_page)`.
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }

    /// Build the response `pagination` block for a total row count.
    pub fn page_info(self, total: u64) -> PageInfo {
        let (page_idx, per_page) = self.normalize();
        let pages = if total == 0 { 0 } else { total.div_ceil(per_page) };
        PageInfo { current: page_idx + 1, pages, total }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: 10 }
    }
}
