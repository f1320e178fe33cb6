//! Page-number pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] is the validated `(page, limit)` pair an inbound adapter
//! extracts from a query string. Repositories translate it into SQL
//! `OFFSET`/`LIMIT` via [`PageRequest::offset`], and list responses wrap the
//! returned rows in a [`Page`] envelope carrying the total match count.
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(3, 20)?;
//! assert_eq!(request.offset(), 40);
//!
//! let page = Page::new(vec!["a", "b"], 42, request);
//! assert_eq!(page.total_pages(), 3);
//! # Ok::<(), pagination::PaginationError>(())
//! ```

use serde::{Deserialize, Serialize};

/// Largest page size a caller may request.
pub const MAX_LIMIT: u64 = 100;

/// Page size used when a caller does not provide one.
pub const DEFAULT_LIMIT: u64 = 10;

/// Validation failures for page requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Pages are numbered from one.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// The requested limit is zero or above [`MAX_LIMIT`].
    #[error("limit must be between 1 and {max}")]
    LimitOutOfRange {
        /// Upper bound that was exceeded.
        max: u64,
    },
}

/// A validated one-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Validate and build a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::PageOutOfRange`] for page `0` and
    /// [`PaginationError::LimitOutOfRange`] when `limit` is `0` or larger than
    /// [`MAX_LIMIT`].
    pub const fn new(page: u64, limit: u64) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::PageOutOfRange);
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PaginationError::LimitOutOfRange { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of items to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of results plus the total number of matching items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Wrap the items returned for `request`.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total matching items across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The request this page answers.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Number of pages needed to cover [`Page::total`].
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.request.limit)
    }

    /// Convert every item, keeping totals and the request.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    //! Validation and arithmetic coverage for page requests.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(5, 25, 100)]
    fn offset_skips_previous_pages(#[case] page: u64, #[case] limit: u64, #[case] offset: u64) {
        let request = PageRequest::new(page, limit).expect("valid request");
        assert_eq!(request.offset(), offset);
    }

    #[rstest]
    #[case(0, 10, PaginationError::PageOutOfRange)]
    #[case(1, 0, PaginationError::LimitOutOfRange { max: MAX_LIMIT })]
    #[case(1, MAX_LIMIT + 1, PaginationError::LimitOutOfRange { max: MAX_LIMIT })]
    fn rejects_out_of_range_values(
        #[case] page: u64,
        #[case] limit: u64,
        #[case] expected: PaginationError,
    ) {
        assert_eq!(PageRequest::new(page, limit), Err(expected));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(10, 1)]
    #[case(11, 2)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] pages: u64) {
        let request = PageRequest::new(1, 10).expect("valid request");
        let page: Page<()> = Page::new(Vec::new(), total, request);
        assert_eq!(page.total_pages(), pages);
    }

    #[test]
    fn map_preserves_totals() {
        let request = PageRequest::new(2, 2).expect("valid request");
        let page = Page::new(vec![1, 2], 7, request).map(|n| n * 10);
        assert_eq!(page.items(), &[10, 20]);
        assert_eq!(page.total(), 7);
        assert_eq!(page.request(), request);
    }

    #[test]
    fn default_request_is_first_page() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), DEFAULT_LIMIT);
        assert_eq!(request.offset(), 0);
    }
}
