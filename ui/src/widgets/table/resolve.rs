//! Pure row derivation: filter, then sort, then paginate.
//!
//! The order is fixed. Changing the filter always re-filters the full
//! dataset, never the already sorted or sliced subset, so a search typed
//! after a sort still sees every row.

use super::columns::{SortKey, TableColumn};

/// Sort order for a clicked header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Arrow appended to the active sort header.
    pub(crate) fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "⏶",
            SortDirection::Descending => "⏷",
        }
    }
}

/// The active sort: which column, which way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDescriptor {
    pub column_id: &'static str,
    pub direction: SortDirection,
}

/// Keep the rows whose filter text contains `needle`, case-insensitively.
/// Rows without a filter extractor on the target column never match.
pub(crate) fn filter_rows<'r, R>(
    rows: impl IntoIterator<Item = &'r R>,
    filter_text: Option<fn(&R) -> String>,
    needle: &str,
) -> Vec<&'r R> {
    let needle = needle.to_lowercase();
    rows.into_iter()
        .filter(|row| match filter_text {
            Some(text) => text(row).to_lowercase().contains(&needle),
            None => false,
        })
        .collect()
}

/// Stable-sort rows by the column's extracted key.
pub(crate) fn sort_rows<R>(rows: &mut [&R], key: fn(&R) -> SortKey, direction: SortDirection) {
    rows.sort_by_key(|row| key(row));
    if direction == SortDirection::Descending {
        rows.reverse();
    }
}

/// Slice out the visible page. An index past the end yields an empty page
/// rather than panicking.
pub(crate) fn page_slice<'r, R>(rows: Vec<&'r R>, page_index: u64, page_size: u64) -> Vec<&'r R> {
    let start = usize::try_from(page_index.saturating_mul(page_size)).unwrap_or(usize::MAX);
    let size = usize::try_from(page_size).unwrap_or(usize::MAX);
    rows.into_iter().skip(start).take(size).collect()
}

/// Pages needed for `total` rows at `size` per page.
pub(crate) fn total_pages_for(total: u64, size: u64) -> u64 {
    if size == 0 { 0 } else { total.div_ceil(size) }
}

/// Columns are looked up by id when applying a sort descriptor.
pub(crate) fn column_by_id<'c, R>(
    columns: &'c [TableColumn<R>],
    id: &str,
) -> Option<&'c TableColumn<R>> {
    columns.iter().find(|column| column.id == id)
}
