use serde::Serialize;
use thiserror::Error;

/// Error for page-request validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageRequestError {
    #[error("Invalid page request: page must be at least 1, got {0}")]
    PageOutOfRange(u64),

    #[error("Invalid page request: limit must be at least 1, got {0}")]
    LimitOutOfRange(u64),
}

/// Validated page request.
///
/// Pages are 1-based; `limit` is the maximum number of items per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Create a validated page request.
    ///
    /// # Errors
    /// * `PageOutOfRange` - `page < 1`
    /// * `LimitOutOfRange` - `limit < 1`
    pub fn new(page: u64, limit: u64) -> Result<Self, PageRequestError> {
        if page < 1 {
            return Err(PageRequestError::PageOutOfRange(page));
        }
        if limit < 1 {
            return Err(PageRequestError::LimitOutOfRange(limit));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

/// Window and metadata computed for one page over a total count.
///
/// Pure arithmetic, total over its domain: a page beyond the last one is
/// not an error, it is an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Items to skip before the window starts
    pub offset: u64,

    /// Items the storage layer should actually return for this page
    pub window_size: u64,

    /// Total pages for this limit (at least 1, even for an empty collection)
    pub total_pages: u64,

    /// Whether pages exist beyond the requested one
    pub has_more: bool,
}

impl PageWindow {
    /// Compute the window for `request` over `total_items`.
    ///
    /// * `offset = (page - 1) * limit`
    /// * `total_pages = max(1, ceil(total_items / limit))`
    /// * `has_more = page < total_pages`
    /// * `window_size = clamp(total_items - offset, 0, limit)`
    ///
    /// Page and limit come straight from the query string, so the offset
    /// arithmetic saturates instead of overflowing; an astronomically large
    /// page is just an empty window.
    pub fn compute(total_items: u64, request: PageRequest) -> Self {
        let limit = request.limit();
        let offset = (request.page() - 1).saturating_mul(limit);
        let total_pages = std::cmp::max(1, total_items.div_ceil(limit));
        let has_more = request.page() < total_pages;
        let window_size = std::cmp::min(total_items.saturating_sub(offset), limit);

        Self {
            offset,
            window_size,
            total_pages,
            has_more,
        }
    }
}

/// One page of an ordered collection plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_more: bool,
}

impl<T> PageResult<T> {
    /// Assemble a page result from a fetched window.
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let window = PageWindow::compute(total_items, request);
        Self {
            items,
            page: request.page(),
            total_items,
            total_pages: window.total_pages,
            has_more: window.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: u64, limit: u64) -> PageRequest {
        PageRequest::new(page, limit).expect("valid page request")
    }

    #[test]
    fn test_rejects_page_zero() {
        assert_eq!(
            PageRequest::new(0, 10),
            Err(PageRequestError::PageOutOfRange(0))
        );
    }

    #[test]
    fn test_rejects_limit_zero() {
        assert_eq!(
            PageRequest::new(1, 0),
            Err(PageRequestError::LimitOutOfRange(0))
        );
    }

    #[test]
    fn test_empty_collection_is_one_empty_page() {
        let window = PageWindow::compute(0, request(1, 10));
        assert_eq!(window.total_pages, 1);
        assert!(!window.has_more);
        assert_eq!(window.offset, 0);
        assert_eq!(window.window_size, 0);
    }

    #[test]
    fn test_first_page_of_partial_last_page_collection() {
        let window = PageWindow::compute(25, request(1, 10));
        assert_eq!(window.total_pages, 3);
        assert!(window.has_more);
        assert_eq!(window.offset, 0);
        assert_eq!(window.window_size, 10);
    }

    #[test]
    fn test_last_partial_page() {
        let window = PageWindow::compute(25, request(3, 10));
        assert!(!window.has_more);
        assert_eq!(window.offset, 20);
        assert_eq!(window.window_size, 5);
    }

    #[test]
    fn test_exact_boundary() {
        let window = PageWindow::compute(20, request(2, 10));
        assert_eq!(window.total_pages, 2);
        assert!(!window.has_more);
        assert_eq!(window.window_size, 10);
    }

    #[test]
    fn test_page_beyond_range_is_empty_not_error() {
        let window = PageWindow::compute(10, request(5, 10));
        assert_eq!(window.window_size, 0);
        assert!(!window.has_more);
        assert_eq!(window.total_pages, 1);
    }

    #[test]
    fn test_huge_page_number_saturates_instead_of_overflowing() {
        let window = PageWindow::compute(10, request(u64::MAX, 10));
        assert_eq!(window.offset, u64::MAX);
        assert_eq!(window.window_size, 0);
        assert!(!window.has_more);
        assert_eq!(window.total_pages, 1);
    }

    #[test]
    fn test_limit_one() {
        let window = PageWindow::compute(3, request(2, 1));
        assert_eq!(window.total_pages, 3);
        assert!(window.has_more);
        assert_eq!(window.offset, 1);
        assert_eq!(window.window_size, 1);
    }

    #[test]
    fn test_window_sizes_cover_collection_exactly() {
        // Sum of window sizes over pages 1..=total_pages equals the total
        for total_items in [0u64, 1, 9, 10, 11, 23, 100] {
            for limit in [1u64, 3, 10] {
                let total_pages = PageWindow::compute(total_items, request(1, limit)).total_pages;
                let covered: u64 = (1..=total_pages)
                    .map(|page| PageWindow::compute(total_items, request(page, limit)).window_size)
                    .sum();
                assert_eq!(covered, total_items, "total={} limit={}", total_items, limit);
            }
        }
    }

    #[test]
    fn test_page_result_metadata() {
        let result = PageResult::new(vec!["a", "b"], request(1, 2), 5);
        assert_eq!(result.page, 1);
        assert_eq!(result.total_items, 5);
        assert_eq!(result.total_pages, 3);
        assert!(result.has_more);
        assert_eq!(result.items.len(), 2);
    }
}
