//! Offset paging over identifier-ordered listings.

use serde::Serialize;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Validation errors returned by [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Size was zero or above [`MAX_PAGE_SIZE`].
    #[error("page size must be between 1 and {max}, got {size}")]
    InvalidSize {
        /// Rejected size.
        size: u32,
        /// Maximum accepted size.
        max: u32,
    },
}

/// Zero-based page index plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    pub fn new(page: u32, size: u32) -> Result<Self, PageRequestError> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(PageRequestError::InvalidSize {
                size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self { page, size })
    }

    /// Zero-based page index.
    pub fn page(self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    pub fn size(self) -> u32 {
        self.size
    }

    /// Number of records skipped before this page.
    pub fn offset(self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// One slice of an identifier-ordered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    request: PageRequest,
    total: u64,
}

impl<T> Page<T> {
    /// Assemble a page from its items and the total record count.
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            request,
            total,
        }
    }

    /// Items on this page, identifier ascending.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Request that produced this page.
    pub fn request(&self) -> PageRequest {
        self.request
    }

    /// Total number of records across all pages.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages needed to cover `total` records.
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.request.size))
    }

    /// Whether a later page holds more records.
    pub fn has_next(&self) -> bool {
        u64::from(self.request.page) + 1 < self.total_pages()
    }
}
