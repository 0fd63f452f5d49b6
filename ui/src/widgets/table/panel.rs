//! The data table widget.

use egui::{RichText, Ui};
use egui_extras::TableBuilder;

use super::columns::{HEADER_HEIGHT, ROW_HEIGHT, TableColumn};
use super::paging::{NavAction, PageRequest, PaginationStrategy, count_text, nav_enabled, navigation_target};
use super::resolve::{SortDescriptor, SortDirection, column_by_id, filter_rows, page_slice, sort_rows, total_pages_for};

/// Interactions from one `show` call that the caller must act on.
///
/// Both fields stay `None` for a client-computed table: it absorbs page
/// clicks and search edits into its own state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableResponse {
    /// A pagination control was clicked (server mode only).
    pub page_requested: Option<PageRequest>,
    /// The search text changed (server mode only); the raw value, the
    /// caller decides when to refetch.
    pub search_changed: Option<String>,
}

/// The visible slice plus the window numbers the footer renders.
struct ResolvedView<'r, R> {
    rows: Vec<&'r R>,
    page_index: u64,
    page_size: u64,
    total_pages: u64,
    total_elements: Option<u64>,
}

/// Generic sortable, filterable, paginated table.
///
/// The pagination mode is fixed at construction: [`DataTable::server_driven`]
/// renders exactly the rows it is given and reports navigation and search
/// edits through [`TableResponse`]; [`DataTable::client_computed`] owns the
/// full dataset and derives the visible page itself, filter first, then
/// sort, then paginate.
///
/// Cell content is supplied per `show` call as a closure over
/// `(ui, row, column_id)`, so column definitions stay free of rendering and
/// the closure can collect row actions the borrow checker would otherwise
/// fight over.
pub struct DataTable<R> {
    columns: Vec<TableColumn<R>>,
    strategy: PaginationStrategy,
    sort: Option<SortDescriptor>,
    search: String,
    /// Server mode: forward search edits instead of filtering locally.
    forward_search: bool,
    /// Client mode: the column whose filter extractor the search box targets.
    search_column: Option<&'static str>,
    /// Rows this predicate accepts render with the selection highlight.
    selected: Option<fn(&R) -> bool>,
}

impl<R> DataTable<R> {
    /// A table over caller-fetched pages. Navigation and search surface as
    /// [`TableResponse`] events; the window is fed back in through
    /// [`DataTable::set_server_window`].
    pub fn server_driven(columns: Vec<TableColumn<R>>) -> Self {
        Self {
            columns,
            strategy: PaginationStrategy::ServerDriven {
                page_index: 0,
                page_size: 10,
                total_pages: 0,
                total_elements: None,
            },
            sort: None,
            search: String::new(),
            forward_search: true,
            search_column: None,
            selected: None,
        }
    }

    /// A table owning its full dataset, paging locally at `page_size` rows.
    /// The search box filters on `search_column`'s extractor, if given.
    pub fn client_computed(
        columns: Vec<TableColumn<R>>,
        page_size: u64,
        search_column: Option<&'static str>,
    ) -> Self {
        Self {
            columns,
            strategy: PaginationStrategy::ClientComputed {
                page_index: 0,
                page_size,
            },
            sort: None,
            search: String::new(),
            forward_search: false,
            search_column,
            selected: None,
        }
    }

    /// Highlight the rows `selected` accepts with the selection style.
    pub fn with_selection(mut self, selected: fn(&R) -> bool) -> Self {
        self.selected = Some(selected);
        self
    }

    /// Push the caller's current window into a server-driven table. Called
    /// each frame before `show` with the numbers from the fetched page
    /// envelope. No-op in client mode.
    pub fn set_server_window(
        &mut self,
        page_index: u64,
        page_size: u64,
        total_pages: u64,
        total_elements: Option<u64>,
    ) {
        if let PaginationStrategy::ServerDriven {
            page_index: index,
            page_size: size,
            total_pages: pages,
            total_elements: elements,
        } = &mut self.strategy
        {
            *index = page_index;
            *size = page_size;
            *pages = total_pages;
            *elements = total_elements;
        }
    }

    pub fn page_index(&self) -> u64 {
        self.strategy.page_index()
    }

    pub fn page_size(&self) -> u64 {
        self.strategy.page_size()
    }

    pub fn sort(&self) -> Option<SortDescriptor> {
        self.sort
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    /// Filter, sort and slice according to the active strategy. Server mode
    /// never slices: the supplied rows already are the current page.
    fn resolved_view<'r>(&self, rows: &'r [R]) -> ResolvedView<'r, R> {
        match &self.strategy {
            PaginationStrategy::ServerDriven {
                page_index,
                page_size,
                total_pages,
                total_elements,
            } => {
                let mut view: Vec<&R> = rows.iter().collect();
                self.apply_sort(&mut view);
                ResolvedView {
                    rows: view,
                    page_index: *page_index,
                    page_size: *page_size,
                    total_pages: *total_pages,
                    total_elements: *total_elements,
                }
            }
            PaginationStrategy::ClientComputed {
                page_index,
                page_size,
            } => {
                let needle = self.search.trim();
                let mut view: Vec<&R> = if needle.is_empty() {
                    rows.iter().collect()
                } else {
                    let filter = self
                        .search_column
                        .and_then(|id| column_by_id(&self.columns, id))
                        .and_then(|column| column.filter_text);
                    filter_rows(rows.iter(), filter, needle)
                };
                self.apply_sort(&mut view);
                let total = view.len() as u64;
                let total_pages = total_pages_for(total, *page_size);
                ResolvedView {
                    rows: page_slice(view, *page_index, *page_size),
                    page_index: *page_index,
                    page_size: *page_size,
                    total_pages,
                    total_elements: Some(total),
                }
            }
        }
    }

    fn apply_sort(&self, view: &mut [&R]) {
        if let Some(descriptor) = self.sort
            && let Some(column) = column_by_id(&self.columns, descriptor.column_id)
            && let Some(key) = column.sort_key
        {
            sort_rows(view, key, descriptor.direction);
        }
    }

    /// Clicking the active sort column flips its direction; clicking another
    /// column starts over ascending.
    fn toggle_sort(&mut self, column_id: &'static str) {
        self.sort = match self.sort {
            Some(current) if current.column_id == column_id => Some(SortDescriptor {
                column_id,
                direction: current.direction.flipped(),
            }),
            _ => Some(SortDescriptor {
                column_id,
                direction: SortDirection::Ascending,
            }),
        };
    }

    /// Server mode reports the target page and leaves its window untouched;
    /// client mode moves its own window and reports nothing.
    fn apply_navigation(&mut self, action: NavAction, total_pages: u64) -> Option<PageRequest> {
        match &mut self.strategy {
            PaginationStrategy::ServerDriven {
                page_index,
                page_size,
                ..
            } => Some(PageRequest {
                index: navigation_target(action, *page_index, total_pages),
                size: *page_size,
            }),
            PaginationStrategy::ClientComputed {
                page_index,
                page_size: _,
            } => {
                *page_index = navigation_target(action, *page_index, total_pages);
                None
            }
        }
    }

    /// Render the search box, header, rows and pagination footer.
    ///
    /// `render_cell` is called once per visible row and column id. While
    /// `is_loading` the body is a single loading row; an empty resolved set
    /// renders a single "No data" row.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        rows: &[R],
        is_loading: bool,
        mut render_cell: impl FnMut(&mut Ui, &R, &'static str),
    ) -> TableResponse {
        let mut response = TableResponse::default();

        if self.forward_search || self.search_column.is_some() {
            let mut search = self.search.clone();
            ui.horizontal(|ui| {
                ui.label("Search:");
                ui.text_edit_singleline(&mut search);
            });
            if search != self.search {
                self.search = search;
                if self.forward_search {
                    response.search_changed = Some(self.search.clone());
                } else if let PaginationStrategy::ClientComputed { page_index, .. } =
                    &mut self.strategy
                {
                    // A changed filter starts over from the first page.
                    *page_index = 0;
                }
            }
            ui.add_space(4.0);
        }

        let view = self.resolved_view(rows);
        let mut sort_clicked: Option<&'static str> = None;
        let mut nav_clicked: Option<NavAction> = None;

        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
        for column in &self.columns {
            builder = builder.column(column.width.to_column());
        }
        builder
            .header(HEADER_HEIGHT, |mut header| {
                for column in &self.columns {
                    header.col(|ui| {
                        render_header_cell(
                            ui,
                            column,
                            self.sort.as_ref(),
                            &mut sort_clicked,
                        );
                    });
                }
            })
            .body(|mut body| {
                if is_loading {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.spinner();
                            ui.label("Loading...");
                        });
                    });
                } else if view.rows.is_empty() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label("No data");
                        });
                    });
                } else {
                    for entity in &view.rows {
                        body.row(ROW_HEIGHT, |mut row| {
                            if let Some(selected) = self.selected {
                                row.set_selected(selected(entity));
                            }
                            for column in &self.columns {
                                row.col(|ui| {
                                    render_cell(ui, entity, column.id);
                                });
                            }
                        });
                    }
                }
            });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            for (action, label, hover) in [
                (NavAction::First, "⏮", "First page"),
                (NavAction::Previous, "◀", "Previous page"),
                (NavAction::Next, "▶", "Next page"),
                (NavAction::Last, "⏭", "Last page"),
            ] {
                let enabled = nav_enabled(action, view.page_index, view.total_pages);
                if ui
                    .add_enabled(enabled, egui::Button::new(label))
                    .on_hover_text(hover)
                    .clicked()
                {
                    nav_clicked = Some(action);
                }
            }
            ui.separator();
            ui.label(count_text(
                view.page_index,
                view.page_size,
                view.total_elements,
                view.total_pages,
            ));
        });

        if let Some(column_id) = sort_clicked {
            self.toggle_sort(column_id);
        }
        if let Some(action) = nav_clicked {
            response.page_requested = self.apply_navigation(action, view.total_pages);
        }

        response
    }
}

/// Sortable headers are buttons carrying the direction arrow when active;
/// the rest are plain bold labels.
fn render_header_cell<R>(
    ui: &mut Ui,
    column: &TableColumn<R>,
    sort: Option<&SortDescriptor>,
    sort_clicked: &mut Option<&'static str>,
) {
    if column.sort_key.is_none() {
        ui.strong(column.title);
        return;
    }

    let title = match sort {
        Some(descriptor) if descriptor.column_id == column.id => {
            format!("{} {}", column.title, descriptor.direction.arrow())
        }
        _ => column.title.to_string(),
    };
    if ui.button(RichText::new(title).strong()).clicked() {
        *sort_clicked = Some(column.id);
    }
}
