//! Page arithmetic for catalog listings.

use serde::Serialize;

/// Fixed number of products shown per listing page.
pub const PRODUCTS_PER_PAGE: usize = 12;

/// A 1-indexed page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Saturates instead of overflowing for absurd page numbers.
    pub fn offset(&self) -> i64 {
        let skipped = self.page.max(1).saturating_sub(1).saturating_mul(self.per_page);
        i64::try_from(skipped).unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

/// Number of pages needed for `total` items; an empty listing still has one page.
pub fn total_pages(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1)).max(1)
}

/// Clamp a requested page into `1..=pages`.
pub fn clamp_page(requested: usize, pages: usize) -> usize {
    requested.clamp(1, pages.max(1))
}

/// Read a page number from a query string value.
///
/// Missing or non-numeric input yields the first page; negative numbers are
/// treated as below range and also yield the first page.
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .map_or(1, |page| usize::try_from(page).unwrap_or(1))
}

/// One page of items plus the navigation data templates need.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, total_pages: usize, total_items: usize) -> Self {
        Self {
            items,
            page,
            total_pages,
            total_items,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}
