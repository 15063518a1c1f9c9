use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

/// Zero-based page request as it arrives in the query string (`?page=0&size=10`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

impl PageParams {
    /// Applies configured defaults and clamps the size into `1..=max_size`.
    pub fn resolve(self, cfg: &PaginationConfig) -> PageRequest {
        let size = self.size.unwrap_or(cfg.default_size).clamp(1, cfg.max_size.max(1));
        PageRequest::new(self.page.unwrap_or(0), size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size: size.max(1) }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Rows to fetch: one more than the page size, to detect a following page.
    pub fn fetch_limit(&self) -> i64 {
        i64::from(self.size) + 1
    }
}

/// One page of rows plus whether another page follows.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Builds a page from a result fetched with [`PageRequest::fetch_limit`].
    pub fn from_overfetch(mut rows: Vec<T>, request: &PageRequest) -> Self {
        let size = request.size() as usize;
        let has_next = rows.len() > size;
        rows.truncate(size);
        Self { items: rows, has_next }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total_elements: i64,
    pub has_next: bool,
}

impl PageInfo {
    pub fn of(total_elements: i64, has_next: bool) -> Self {
        Self { total_elements, has_next }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overfetch_detects_next_page() {
        let request = PageRequest::new(0, 10);
        let page = Page::from_overfetch((0..11).collect::<Vec<_>>(), &request);
        assert!(page.has_next);
        assert_eq!(page.items.len(), 10);

        let page = Page::from_overfetch((0..3).collect::<Vec<_>>(), &PageRequest::new(1, 10));
        assert!(!page.has_next);
        assert_eq!(page.items, vec![0, 1, 2]);
    }

    #[test]
    fn offsets_are_page_times_size() {
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 30);
        assert_eq!(PageRequest::new(2, 0).size(), 1);
    }

    #[test]
    fn params_fall_back_to_config_and_clamp() {
        let cfg = PaginationConfig { default_size: 10, max_size: 50 };
        assert_eq!(PageParams::default().resolve(&cfg), PageRequest::new(0, 10));
        let params = PageParams { page: Some(2), size: Some(500) };
        let resolved = params.resolve(&cfg);
        assert_eq!(resolved.page(), 2);
        assert_eq!(resolved.size(), 50);
    }
}
