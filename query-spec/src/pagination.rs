//! Page resolution
//!
//! Turns the optional, possibly out-of-range `page` / `pageSize` inputs into
//! a consistent [`Pagination`]. Missing or non-positive values fall back to
//! page 1 and the resolver's default page size.
//!
//! The resolver enforces no upper bound on the page size. Capping is left to
//! the integrating service.
//!
//! # Example
//!
//! ```rust
//! use query_spec::PaginationResolver;
//!
//! let resolver = PaginationResolver::new(10);
//!
//! let page3 = resolver.resolve(Some(3), Some(20));
//! assert_eq!(page3.skip(), 40);
//! assert_eq!(page3.take(), 20);
//!
//! let fallback = resolver.resolve(Some(0), None);
//! assert_eq!(fallback.page(), 1);
//! assert_eq!(fallback.page_size(), 10);
//! ```

use serde::Serialize;

/// Page used when none (or a non-positive one) is requested
pub const DEFAULT_PAGE: u64 = 1;

/// Resolved pagination window
///
/// Only [`PaginationResolver`] builds this type, so `skip` and `take` always
/// agree with `page` and `page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    page: u64,
    page_size: u64,
    skip: u64,
    take: u64,
}

impl Pagination {
    fn from_page(page: u64, page_size: u64) -> Self {
        Self {
            page,
            page_size,
            skip: page.saturating_sub(1).saturating_mul(page_size),
            take: page_size,
        }
    }

    /// Current page number (1-indexed)
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Requested number of items per page
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of rows to skip
    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.skip
    }

    /// Number of rows to take
    #[must_use]
    pub const fn take(&self) -> u64 {
        self.take
    }
}

/// Resolves raw page inputs into a [`Pagination`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationResolver {
    default_page_size: u64,
}

impl PaginationResolver {
    /// Create a resolver with the given default page size
    ///
    /// A default of 0 is treated as 1.
    #[must_use]
    pub fn new(default_page_size: u32) -> Self {
        Self {
            default_page_size: u64::from(default_page_size.max(1)),
        }
    }

    /// Page size used when none (or a non-positive one) is requested
    #[must_use]
    pub const fn default_page_size(&self) -> u64 {
        self.default_page_size
    }

    /// Resolve page and page size
    #[must_use]
    pub fn resolve(&self, page: Option<i64>, page_size: Option<i64>) -> Pagination {
        let page = positive(page).unwrap_or_else(|| {
            tracing::debug!(requested = ?page, "Using default page");
            DEFAULT_PAGE
        });
        let page_size = positive(page_size).unwrap_or_else(|| {
            tracing::debug!(requested = ?page_size, default = self.default_page_size, "Using default page size");
            self.default_page_size
        });

        Pagination::from_page(page, page_size)
    }
}

fn positive(value: Option<i64>) -> Option<u64> {
    value.filter(|n| *n > 0).map(i64::unsigned_abs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PaginationResolver {
        PaginationResolver::new(10)
    }

    #[test]
    fn test_defaults_when_absent() {
        let pagination = resolver().resolve(None, None);
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.page_size(), 10);
        assert_eq!(pagination.skip(), 0);
        assert_eq!(pagination.take(), 10);
    }

    #[test]
    fn test_non_positive_inputs_use_defaults() {
        for page in [0, -1, i64::MIN] {
            assert_eq!(resolver().resolve(Some(page), Some(5)).page(), 1);
        }
        for page_size in [0, -10, i64::MIN] {
            assert_eq!(resolver().resolve(Some(2), Some(page_size)).page_size(), 10);
        }
    }

    #[test]
    fn test_skip_and_take_consistent() {
        for page in 1..=5_i64 {
            for page_size in [1_i64, 2, 10, 25] {
                let pagination = resolver().resolve(Some(page), Some(page_size));
                assert_eq!(pagination.skip(), ((page - 1) * page_size) as u64);
                assert_eq!(pagination.take(), page_size as u64);
                assert_eq!(pagination.page_size(), pagination.take());
            }
        }
    }

    #[test]
    fn test_page_size_has_no_upper_bound() {
        let pagination = resolver().resolve(Some(1), Some(1_000_000_000));
        assert_eq!(pagination.take(), 1_000_000_000);

        let pagination = resolver().resolve(Some(1), Some(i64::MAX));
        assert_eq!(pagination.take(), i64::MAX as u64);
        assert_eq!(pagination.skip(), 0);
    }

    #[test]
    fn test_extreme_inputs_saturate_skip() {
        let pagination = resolver().resolve(Some(i64::MAX), Some(i64::MAX));
        assert_eq!(pagination.skip(), u64::MAX);
        assert_eq!(pagination.page(), i64::MAX as u64);
    }

    #[test]
    fn test_configured_default_page_size() {
        let pagination = PaginationResolver::new(25).resolve(Some(2), None);
        assert_eq!(pagination.page_size(), 25);
        assert_eq!(pagination.skip(), 25);
    }

    #[test]
    fn test_zero_default_page_size_is_one() {
        assert_eq!(PaginationResolver::new(0).default_page_size(), 1);
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let json = serde_json::to_value(resolver().resolve(Some(2), Some(2))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"page": 2, "pageSize": 2, "skip": 2, "take": 2})
        );
    }
}
