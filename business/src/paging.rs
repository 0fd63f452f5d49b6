//! Server pagination envelope and list query building.

use serde::{Deserialize, Serialize};

/// One page of results as the server reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based page index.
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    /// The server omits these flags on some responses; absent reads as false.
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            page: 0,
            size: 0,
            total_elements: 0,
            total_pages: 0,
            first: true,
            last: true,
        }
    }
}

/// Sort direction mirrored to the server's `sortDir` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    Asc,
    /// The server default: newest first.
    #[default]
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Query string for a paged list endpoint. Blank search terms are left out
/// entirely so the server sees "no filter" rather than an empty one.
pub fn page_query_string(
    page: u64,
    size: u64,
    search: &str,
    sort_by: &str,
    sort_dir: SortDir,
) -> String {
    let mut query = format!("?page={page}&size={size}");
    let search = search.trim();
    if !search.is_empty() {
        query.push_str("&search=");
        query.push_str(&urlencoding::encode(search));
    }
    query.push_str("&sortBy=");
    query.push_str(sort_by);
    query.push_str("&sortDir=");
    query.push_str(sort_dir.as_str());
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserializes_server_shape() {
        let json = r#"{"content":[{"id":1}],"page":0,"size":10,"totalElements":1,"totalPages":1,"last":true}"#;
        let page: Page<serde_json::Value> =
            serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_elements, 1);
        assert!(!page.first, "missing first falls back to false");
        assert!(page.last);
    }

    #[test]
    fn test_query_string_includes_all_params() {
        let query = page_query_string(2, 25, "alpha beta", "createdAt", SortDir::Asc);
        assert_eq!(
            query,
            "?page=2&size=25&search=alpha%20beta&sortBy=createdAt&sortDir=asc"
        );
    }

    #[test]
    fn test_query_string_omits_blank_search() {
        let query = page_query_string(0, 10, "   ", "createdAt", SortDir::Desc);
        assert_eq!(query, "?page=0&size=10&sortBy=createdAt&sortDir=desc");
    }

    #[test]
    fn test_sort_dir_flips() {
        assert_eq!(SortDir::Desc.flipped(), SortDir::Asc);
        assert_eq!(SortDir::default(), SortDir::Desc);
    }
}
