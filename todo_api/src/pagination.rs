use serde::Serialize;
use utoipa::ToSchema;

/// Rejected pagination arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageMetaError {
    #[error("page must be at least 1")]
    InvalidPage,
    #[error("pageSize must be at least 1")]
    InvalidPageSize,
}

/// Pagination metadata derived for one page of a listing.
///
/// Navigation links are built from the request path, so a client can follow
/// them without knowing the route layout:
///
/// ```rust
/// use todo_api::pagination::PageMeta;
///
/// let meta = PageMeta::new(5, "/api/todos", 2, 5, 12).unwrap();
/// assert_eq!(meta.total_pages, 3);
/// assert_eq!(meta.previous_page_url.as_deref(), Some("/api/todos?page=1&pageSize=5"));
/// assert_eq!(meta.next_page_url.as_deref(), Some("/api/todos?page=3&pageSize=5"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub items_in_page: u64,
    pub base_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_url: Option<String>,
}

impl PageMeta {
    /// Compute the metadata for a page.
    ///
    /// # Errors
    ///
    /// Returns [`PageMetaError`] when `current_page` or `page_size` is zero.
    pub fn new(
        items_in_page: u64,
        base_path: impl Into<String>,
        current_page: u64,
        page_size: u64,
        total_items: u64,
    ) -> Result<Self, PageMetaError> {
        if page_size == 0 {
            return Err(PageMetaError::InvalidPageSize);
        }
        if current_page == 0 {
            return Err(PageMetaError::InvalidPage);
        }

        let base_path = base_path.into();
        let total_pages = total_items.div_ceil(page_size);

        let previous_page_url =
            (current_page > 1).then(|| page_url(&base_path, current_page - 1, page_size));
        let next_page_url =
            (current_page < total_pages).then(|| page_url(&base_path, current_page + 1, page_size));

        Ok(Self {
            current_page,
            page_size,
            total_items,
            total_pages,
            items_in_page,
            base_path,
            previous_page_url,
            next_page_url,
        })
    }

    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.previous_page_url.is_some()
    }

    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.next_page_url.is_some()
    }
}

fn page_url(base_path: &str, page: u64, page_size: u64) -> String {
    format!("{base_path}?page={page}&pageSize={page_size}")
}

/// Offset of the first row on `page` (1-based).
#[must_use]
pub fn page_offset(page: u64, page_size: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Largest LIMIT or OFFSET the database drivers accept.
pub const MAX_SQL_WINDOW: u64 = i64::MAX.unsigned_abs();

/// `(offset, limit)` for `page`, or `None` when the page starts beyond
/// anything a database can address; such a page is always empty.
#[must_use]
pub fn sql_window(page: u64, page_size: u64) -> Option<(u64, u64)> {
    let offset = page.saturating_sub(1).checked_mul(page_size)?;
    (offset <= MAX_SQL_WINDOW).then(|| (offset, page_size.min(MAX_SQL_WINDOW)))
}

/// Number of rows a page holds once the total is known.
#[must_use]
pub fn expected_items_in_page(page: u64, page_size: u64, total_items: u64) -> u64 {
    total_items
        .saturating_sub(page_offset(page, page_size))
        .min(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page_has_both_links() {
        let meta = PageMeta::new(5, "/api/todos", 2, 5, 12).unwrap();
        assert_eq!(meta.total_pages, 3);
        assert_eq!(
            meta.previous_page_url.as_deref(),
            Some("/api/todos?page=1&pageSize=5")
        );
        assert_eq!(
            meta.next_page_url.as_deref(),
            Some("/api/todos?page=3&pageSize=5")
        );
    }

    #[test]
    fn test_last_page_has_no_next_link() {
        let meta = PageMeta::new(2, "/api/todos", 3, 5, 12).unwrap();
        assert!(meta.has_previous_page());
        assert!(!meta.has_next_page());
        assert_eq!(meta.items_in_page, 2);
    }

    #[test]
    fn test_first_page_has_no_previous_link() {
        let meta = PageMeta::new(5, "/api/todos/pending", 1, 5, 12).unwrap();
        assert!(meta.previous_page_url.is_none());
        assert_eq!(
            meta.next_page_url.as_deref(),
            Some("/api/todos/pending?page=2&pageSize=5")
        );
    }

    #[test]
    fn test_empty_collection() {
        let meta = PageMeta::new(0, "/api/todos", 1, 5, 0).unwrap();
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_previous_page());
        assert!(!meta.has_next_page());
    }

    #[test]
    fn test_exact_multiple_of_page_size() {
        let meta = PageMeta::new(5, "/api/todos", 2, 5, 10).unwrap();
        assert_eq!(meta.total_pages, 2);
        assert!(!meta.has_next_page());
    }

    #[test]
    fn test_page_beyond_range_links_back() {
        let meta = PageMeta::new(0, "/api/todos", 7, 5, 12).unwrap();
        assert!(!meta.has_next_page());
        assert_eq!(
            meta.previous_page_url.as_deref(),
            Some("/api/todos?page=6&pageSize=5")
        );
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert_eq!(
            PageMeta::new(0, "/api/todos", 1, 0, 12),
            Err(PageMetaError::InvalidPageSize)
        );
    }

    #[test]
    fn test_zero_page_is_rejected() {
        assert_eq!(
            PageMeta::new(0, "/api/todos", 0, 5, 12),
            Err(PageMetaError::InvalidPage)
        );
    }

    #[test]
    fn test_links_follow_page_position_for_every_page() {
        for page_size in 1..=7u64 {
            for total in 0..=30u64 {
                let total_pages = total.div_ceil(page_size);
                for page in 1..=total_pages + 1 {
                    let meta = PageMeta::new(0, "/t", page, page_size, total).unwrap();
                    assert_eq!(meta.has_next_page(), page < total_pages);
                    assert_eq!(meta.has_previous_page(), page > 1);
                }
            }
        }
    }

    #[test]
    fn test_sql_window_for_ordinary_pages() {
        assert_eq!(sql_window(1, 5), Some((0, 5)));
        assert_eq!(sql_window(3, 5), Some((10, 5)));
    }

    #[test]
    fn test_sql_window_clamps_huge_page_size() {
        assert_eq!(sql_window(1, u64::MAX), Some((0, MAX_SQL_WINDOW)));
    }

    #[test]
    fn test_sql_window_is_none_past_addressable_rows() {
        assert_eq!(sql_window(4_000_000_000_000_000_000, 5), None);
        assert_eq!(sql_window(2, u64::MAX), None);
        assert_eq!(sql_window(u64::MAX, u64::MAX), None);
    }

    #[test]
    fn test_expected_items_in_page() {
        assert_eq!(expected_items_in_page(1, 5, 12), 5);
        assert_eq!(expected_items_in_page(2, 5, 12), 5);
        assert_eq!(expected_items_in_page(3, 5, 12), 2);
        assert_eq!(expected_items_in_page(4, 5, 12), 0);
        assert_eq!(expected_items_in_page(1, 5, 0), 0);
    }

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(page_offset(1, 5), 0);
        assert_eq!(page_offset(3, 5), 10);
    }
}
