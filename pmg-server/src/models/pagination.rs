//! Pagination types
//!
//! Pages are 0-indexed: the frontend links to `/members/0/`, `/members/1/`
//! and so on, and asks the API for `?page=N` with the same numbering.

use serde::Deserialize;

/// Maximum items per page
pub const MAX_PER_PAGE: u32 = 250;

/// Default items per page
pub const DEFAULT_PER_PAGE: u32 = 50;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (0-indexed)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

impl Pagination {
    /// Per page is clamped to 1..=MAX_PER_PAGE.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Build from query parameters, using `default_per_page` when the
    /// client did not ask for a page size.
    pub fn from_params(params: PaginationParams, default_per_page: u32) -> Self {
        Self::new(
            params.page.unwrap_or(0),
            params.per_page.unwrap_or(default_per_page),
        )
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        self.page as i64 * self.per_page as i64
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    /// Whether results remain after this page.
    pub fn has_more(&self, total: i64) -> bool {
        (self.page as i64 + 1) * (self.per_page as i64) < total
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of rows plus the total across all pages
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: Pagination,
}

/// Query parameters for pagination
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_calculation() {
        assert_eq!(Pagination::new(0, 10).offset(), 0);
        assert_eq!(Pagination::new(1, 10).offset(), 10);
        assert_eq!(Pagination::new(2, 25).offset(), 50);
    }

    #[test]
    fn clamps_per_page() {
        assert_eq!(Pagination::new(0, 0).per_page, 1);
        assert_eq!(Pagination::new(0, 9999).per_page, MAX_PER_PAGE);
    }

    #[test]
    fn has_more() {
        let p = Pagination::new(0, 10);
        assert!(p.has_more(11));
        assert!(!p.has_more(10));
        assert!(!p.has_more(0));
        assert!(Pagination::new(1, 10).has_more(21));
        assert!(!Pagination::new(2, 10).has_more(30));
    }

    #[test]
    fn params_fall_back_to_default_size() {
        let p = Pagination::from_params(PaginationParams::default(), 20);
        assert_eq!(p, Pagination::new(0, 20));

        let p = Pagination::from_params(
            PaginationParams {
                page: Some(3),
                per_page: Some(5),
            },
            20,
        );
        assert_eq!(p, Pagination::new(3, 5));
    }
}
