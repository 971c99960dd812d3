//! Shared request/response pieces: error body and page-number pagination

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body for the PATCH endpoints that flip a single fulfilment flag
#[derive(Debug, Clone, Deserialize)]
pub struct FlagUpdateRequest {
    pub value: bool,
}

/// `page` / `page_size` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PageQuery {
    pub fn new(page: Option<u64>, page_size: Option<u64>) -> Self {
        Self { page, page_size }
    }

    /// Resolve to a 1-based page and a page size capped at `MAX_PAGE_SIZE`.
    /// A zero page size counts as unset.
    pub fn resolve(&self) -> Result<(u64, u64), String> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err("Invalid page".to_string());
        }
        let page_size = self
            .page_size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        Ok((page, page_size))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, count: u64, page: u64, page_size: u64) -> Self {
        Self {
            count,
            page,
            page_size,
            total_pages: total_pages(count, page_size),
            results,
        }
    }

    /// Slice an already materialised list
    pub fn from_vec(items: Vec<T>, page: u64, page_size: u64) -> Result<Self, String> {
        let count = items.len() as u64;
        check_page(page, count, page_size)?;
        let skip = ((page - 1) * page_size) as usize;
        let results = items
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();
        Ok(Self::new(results, count, page, page_size))
    }
}

pub fn total_pages(count: u64, page_size: u64) -> u64 {
    if count == 0 {
        1
    } else {
        count.div_ceil(page_size)
    }
}

/// Page 1 is always valid; later pages must exist.
pub fn check_page(page: u64, count: u64, page_size: u64) -> Result<(), String> {
    if page == 0 || page > total_pages(count, page_size) {
        return Err("Invalid page".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.resolve().unwrap(), (1, 10));
    }

    #[test]
    fn test_page_size_clamped() {
        let query = PageQuery {
            page: Some(2),
            page_size: Some(500),
        };
        assert_eq!(query.resolve().unwrap(), (2, 100));
    }

    #[test]
    fn test_zero_page_size_uses_default() {
        let query = PageQuery::new(Some(3), Some(0));
        assert_eq!(query.resolve().unwrap(), (3, 10));
    }

    #[test]
    fn test_page_zero_rejected() {
        let query = PageQuery {
            page: Some(0),
            page_size: None,
        };
        assert!(query.resolve().is_err());
    }

    #[test]
    fn test_from_vec_slices_pages() {
        let items: Vec<u32> = (1..=25).collect();
        let page = Paginated::from_vec(items, 3, 10).unwrap();
        assert_eq!(page.count, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results, vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_page_past_end_is_invalid() {
        let items: Vec<u32> = (1..=5).collect();
        assert!(Paginated::from_vec(items, 2, 10).is_err());
        let empty: Vec<u32> = Vec::new();
        assert!(Paginated::from_vec(empty, 1, 10).is_ok());
    }
}
