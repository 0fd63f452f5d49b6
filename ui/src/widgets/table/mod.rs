//! Reusable data table split into focused submodules:
//!
//! - `columns`: column definitions, widths and sort keys
//! - `paging`: pagination strategies, navigation math and the footer text
//! - `resolve`: the pure filter, sort, paginate pipeline
//! - `panel`: the [`DataTable`] widget tying it all together

mod columns;
mod paging;
mod panel;
mod resolve;

pub use columns::{ColumnWidth, HEADER_HEIGHT, ROW_HEIGHT, SortKey, TableColumn};
pub use paging::{NavAction, PageRequest, PaginationStrategy};
pub use panel::{DataTable, TableResponse};
pub use resolve::{SortDescriptor, SortDirection};
