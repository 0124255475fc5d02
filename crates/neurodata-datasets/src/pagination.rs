use serde::Serialize;

use crate::error::{DatasetError, Result};

/// Page-size policy for a listing: default size plus a hard upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPreset {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl PaginationPreset {
    pub const STANDARD: Self = Self {
        default_page_size: 20,
        max_page_size: 100,
    };
    pub const LARGE: Self = Self {
        default_page_size: 50,
        max_page_size: 1000,
    };
    pub const SMALL: Self = Self {
        default_page_size: 10,
        max_page_size: 50,
    };

    /// Build a request, falling back to the default size and clamping to
    /// `1..=max_page_size`.
    pub fn request(&self, page: u32, page_size: Option<u32>) -> PageRequest {
        let size = page_size
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size);
        PageRequest {
            page,
            page_size: size,
        }
    }
}

impl Default for PaginationPreset {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Total pages for `total` items. An empty collection still has one page.
    pub fn total_pages(&self, total: u64) -> u32 {
        let size = u64::from(self.page_size.max(1));
        u32::try_from(total.div_ceil(size).max(1)).unwrap_or(u32::MAX)
    }

    /// Reject page 0 and pages past the end.
    pub fn validate(&self, total: u64) -> Result<()> {
        let total_pages = self.total_pages(total);
        if self.page == 0 || self.page > total_pages {
            return Err(DatasetError::InvalidPage {
                page: self.page,
                total_pages,
            });
        }
        Ok(())
    }
}

/// One page of results with enough metadata to render navigation.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let total_pages = request.total_pages(total);
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages,
            has_next: request.page < total_pages,
            has_previous: request.page > 1,
        }
    }
}
