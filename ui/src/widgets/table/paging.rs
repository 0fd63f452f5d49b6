//! Pagination strategies and page-navigation arithmetic.

/// Who owns the page window.
///
/// Picked once when the table is constructed and never changed afterwards:
/// a server-driven table reports navigation through [`PageRequest`] events
/// and treats its window fields as caller-supplied read-only inputs, while a
/// client-computed table mutates its own window and emits nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationStrategy {
    /// The caller fetches pages; the rows handed to `show` are exactly the
    /// current page and are never sliced.
    ServerDriven {
        page_index: u64,
        page_size: u64,
        total_pages: u64,
        /// Enables the "N total, showing a-b" count text when known.
        total_elements: Option<u64>,
    },
    /// The table holds the full dataset and slices the visible page itself.
    ClientComputed { page_index: u64, page_size: u64 },
}

impl PaginationStrategy {
    pub fn page_index(&self) -> u64 {
        match self {
            PaginationStrategy::ServerDriven { page_index, .. }
            | PaginationStrategy::ClientComputed { page_index, .. } => *page_index,
        }
    }

    pub fn page_size(&self) -> u64 {
        match self {
            PaginationStrategy::ServerDriven { page_size, .. }
            | PaginationStrategy::ClientComputed { page_size, .. } => *page_size,
        }
    }
}

/// Navigation request a server-driven table hands back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based target page.
    pub index: u64,
    pub size: u64,
}

/// The four pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    First,
    Previous,
    Next,
    Last,
}

/// Target page index for a control, given the current window.
pub(crate) fn navigation_target(action: NavAction, page_index: u64, total_pages: u64) -> u64 {
    match action {
        NavAction::First => 0,
        NavAction::Previous => page_index.saturating_sub(1),
        NavAction::Next => page_index + 1,
        NavAction::Last => total_pages.saturating_sub(1),
    }
}

/// Whether a control is clickable for the current window. First/Previous
/// grey out on the first page, Next/Last on the last.
pub(crate) fn nav_enabled(action: NavAction, page_index: u64, total_pages: u64) -> bool {
    match action {
        NavAction::First | NavAction::Previous => page_index > 0,
        NavAction::Next | NavAction::Last => page_index + 1 < total_pages,
    }
}

/// Footer text describing the visible window.
///
/// With a known element count: `"{total} total, showing {start}-{end}"`,
/// where `start`/`end` are one-based row positions. Without one, fall back
/// to `"page {n} of {m}"`.
pub(crate) fn count_text(page_index: u64, page_size: u64, total_elements: Option<u64>, total_pages: u64) -> String {
    match total_elements {
        Some(0) => "0 total, showing 0-0".to_string(),
        Some(total) => {
            let start = page_index * page_size + 1;
            let end = ((page_index + 1) * page_size).min(total);
            format!("{total} total, showing {start}-{end}")
        }
        None => format!("page {} of {}", page_index + 1, total_pages.max(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_targets() {
        assert_eq!(navigation_target(NavAction::First, 3, 5), 0);
        assert_eq!(navigation_target(NavAction::Previous, 3, 5), 2);
        assert_eq!(navigation_target(NavAction::Next, 3, 5), 4);
        assert_eq!(navigation_target(NavAction::Last, 3, 5), 4);
    }

    #[test]
    fn test_previous_saturates_at_zero() {
        assert_eq!(navigation_target(NavAction::Previous, 0, 5), 0);
        assert_eq!(navigation_target(NavAction::Last, 0, 0), 0);
    }

    #[test]
    fn test_backward_controls_disabled_on_first_page() {
        assert!(!nav_enabled(NavAction::First, 0, 5));
        assert!(!nav_enabled(NavAction::Previous, 0, 5));
        assert!(nav_enabled(NavAction::Next, 0, 5));
        assert!(nav_enabled(NavAction::Last, 0, 5));
    }

    #[test]
    fn test_forward_controls_disabled_on_last_page() {
        assert!(nav_enabled(NavAction::First, 4, 5));
        assert!(nav_enabled(NavAction::Previous, 4, 5));
        assert!(!nav_enabled(NavAction::Next, 4, 5));
        assert!(!nav_enabled(NavAction::Last, 4, 5));
    }

    #[test]
    fn test_everything_disabled_on_single_page() {
        for action in [NavAction::First, NavAction::Previous, NavAction::Next, NavAction::Last] {
            assert!(!nav_enabled(action, 0, 1), "{action:?} should be disabled");
        }
    }

    #[test]
    fn test_count_text_with_total() {
        assert_eq!(count_text(1, 10, Some(25), 3), "25 total, showing 11-20");
        assert_eq!(count_text(2, 10, Some(25), 3), "25 total, showing 21-25");
        assert_eq!(count_text(0, 10, Some(25), 3), "25 total, showing 1-10");
        assert_eq!(count_text(0, 10, Some(0), 0), "0 total, showing 0-0");
    }

    #[test]
    fn test_count_text_without_total() {
        assert_eq!(count_text(0, 10, None, 3), "page 1 of 3");
        assert_eq!(count_text(0, 10, None, 0), "page 1 of 1");
    }
}
