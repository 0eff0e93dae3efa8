//! Page-based pagination for list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw query-string parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// Sanitized page selection. `page` and `limit` are clamped to at least 1;
/// `limit` is additionally capped to keep list queries bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn clamped(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(page: Page, total: i64) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total,
            total_pages: (total + page.limit - 1) / page.limit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_absent() {
        let page = Page::clamped(None, None);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn page_and_limit_are_clamped_to_one() {
        let page = Page::clamped(Some(0), Some(-5));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 1);
    }

    #[test]
    fn limit_is_capped() {
        assert_eq!(Page::clamped(None, Some(10_000)).limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn total_pages_is_ceiling_of_total_over_limit() {
        let page = Page::clamped(Some(1), Some(10));
        assert_eq!(PaginationMeta::new(page, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(page, 1).total_pages, 1);
        assert_eq!(PaginationMeta::new(page, 10).total_pages, 1);
        assert_eq!(PaginationMeta::new(page, 11).total_pages, 2);
        assert_eq!(PaginationMeta::new(page, 95).total_pages, 10);
    }

    #[test]
    fn offset_advances_with_page() {
        let page = Page::clamped(Some(3), Some(25));
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn meta_serializes_camel_case() {
        let meta = PaginationMeta::new(Page::clamped(Some(2), Some(10)), 35);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["totalPages"], 4);
        assert_eq!(json["page"], 2);
    }
}
