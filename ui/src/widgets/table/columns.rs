//! Column definitions for the data table.

use egui_extras::Column;

/// Fixed row heights for consistent table layout
pub const ROW_HEIGHT: f32 = 30.0;
pub const HEADER_HEIGHT: f32 = 24.0;

/// How a column claims horizontal space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// Fixed width in points.
    Exact(f32),
    /// Fills the remaining space, never narrower than `at_least`.
    Remainder { at_least: f32 },
}

impl ColumnWidth {
    pub(crate) fn to_column(self) -> Column {
        match self {
            ColumnWidth::Exact(width) => Column::exact(width),
            ColumnWidth::Remainder { at_least } => Column::remainder().at_least(at_least),
        }
    }
}

/// Comparable key a sortable column extracts from a row.
///
/// Text keys are lowercased on construction so ordering ignores case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Number(i64),
    Text(String),
}

impl SortKey {
    pub fn number(value: i64) -> Self {
        SortKey::Number(value)
    }

    pub fn text(value: &str) -> Self {
        SortKey::Text(value.to_lowercase())
    }
}

/// One column of a [`DataTable`](super::DataTable).
///
/// A column describes layout and derivation only; cell content is rendered by
/// the closure handed to `DataTable::show`, keyed by `id`. A column with a
/// sort key gets a clickable header; a column with a filter extractor can act
/// as the search target in client mode.
pub struct TableColumn<R> {
    pub id: &'static str,
    pub title: &'static str,
    pub width: ColumnWidth,
    pub sort_key: Option<fn(&R) -> SortKey>,
    pub filter_text: Option<fn(&R) -> String>,
}

impl<R> TableColumn<R> {
    pub fn new(id: &'static str, title: &'static str, width: ColumnWidth) -> Self {
        Self {
            id,
            title,
            width,
            sort_key: None,
            filter_text: None,
        }
    }

    /// Make the header clickable, ordering rows by the extracted key.
    pub fn sortable(mut self, key: fn(&R) -> SortKey) -> Self {
        self.sort_key = Some(key);
        self
    }

    /// Text the search box matches against when this column is the search
    /// target (client mode). Matching is case-insensitive substring
    /// containment over whatever the extractor returns.
    pub fn filterable(mut self, text: fn(&R) -> String) -> Self {
        self.filter_text = Some(text);
        self
    }
}
