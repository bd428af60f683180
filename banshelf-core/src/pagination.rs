use crate::error::{Error, Result};

/// Default number of books per page in the browser
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// One page of a filtered result
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Number of pages needed for `total_items`; zero items means zero pages
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Slice out the requested 1-based page
///
/// Out-of-range pages are a caller error and are never clamped. The one
/// exception is page 1 of an empty result, which yields an empty page.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Result<Page<'_, T>> {
    if page_size == 0 {
        return Err(Error::InvalidInput("page size must be at least 1".to_string()));
    }

    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);

    if page == 0 || (page > total_pages && !(page == 1 && total_items == 0)) {
        return Err(Error::PageOutOfRange { page, total_pages });
    }

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);

    Ok(Page {
        items: &items[start..end],
        page,
        total_pages,
        total_items,
    })
}
