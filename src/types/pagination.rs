//! Pagination types for list pages and endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};

/// Pagination query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// 1-indexed page number
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Page is kept within `1..=MAX_PAGE_NUMBER`, page size within `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE_NUMBER),
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// From a raw `?page=` value typed by a visitor; garbage means page 1.
    pub fn from_raw(page: Option<&str>, per_page: u64) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_PAGE_NUMBER);
        Self::new(page, per_page)
    }

    /// Page number actually served. Values deserialized straight from a
    /// query string skip `new`, so the bounds are applied here too.
    pub fn current_page(&self) -> u64 {
        self.page.clamp(1, MAX_PAGE_NUMBER)
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        self.page_index() * self.limit()
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }

    /// Zero-based page index for SeaORM paginators
    pub fn page_index(&self) -> u64 {
        self.current_page() - 1
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, params: PaginationParams, total: u64) -> Self {
        let per_page = params.limit();
        Self {
            data,
            meta: PaginationMeta {
                page: params.current_page(),
                per_page,
                total,
                total_pages: total.div_ceil(per_page),
            },
        }
    }

    pub fn empty(params: PaginationParams) -> Self {
        Self::new(Vec::new(), params, 0)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let params = PaginationParams::new(3, 12);
        assert_eq!(params.offset(), 24);
        assert_eq!(params.limit(), 12);
        assert_eq!(params.page_index(), 2);
    }

    #[test]
    fn test_normalization() {
        let params = PaginationParams::new(0, 10_000);
        assert_eq!(params.page, 1);
        assert_eq!(params.limit(), MAX_PAGE_SIZE);

        assert_eq!(PaginationParams::from_raw(Some("abc"), 12).page, 1);
        assert_eq!(PaginationParams::from_raw(Some(" 4 "), 12).page, 4);
        assert_eq!(PaginationParams::from_raw(None, 12).per_page, 12);
    }

    #[test]
    fn test_huge_page_numbers_are_capped() {
        let params = PaginationParams::from_raw(Some("18446744073709551615"), 12);
        assert_eq!(params.page, MAX_PAGE_NUMBER);
        assert_eq!(params.offset(), (MAX_PAGE_NUMBER - 1) * 12);

        let raw: PaginationParams =
            serde_json::from_str(r#"{"page": 18446744073709551615, "per_page": 100}"#).unwrap();
        assert_eq!(raw.page_index(), MAX_PAGE_NUMBER - 1);
        assert_eq!(raw.offset(), (MAX_PAGE_NUMBER - 1) * 100);

        let page: Paginated<u8> = Paginated::new(vec![], raw, 3);
        assert_eq!(page.meta.page, MAX_PAGE_NUMBER);
        assert!(!page.meta.has_next());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page: Paginated<u8> = Paginated::new(vec![], PaginationParams::new(1, 12), 25);
        assert_eq!(page.meta.total_pages, 3);
        assert!(page.meta.has_next());
        assert!(!page.meta.has_previous());

        let empty: Paginated<u8> = Paginated::empty(PaginationParams::new(1, 12));
        assert_eq!(empty.meta.total_pages, 0);
        assert!(!empty.meta.has_next());
    }
}
