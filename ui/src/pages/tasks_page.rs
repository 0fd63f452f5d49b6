//! Tasks page: the landing page after sign-in.
//!
//! A server-paginated table over the signed-in user's tasks. The page keeps
//! [`TaskListQuery`] as the single source of truth: table interactions only
//! edit the query, and the cache staleness check turns the edit into a
//! refetch on the next frame.

use egui::{Color32, Response, RichText, Ui};
use taskdeck_business::Route;
use taskdeck_business::tasks::{
    DeleteTaskCommand, RefreshTasksCommand, ResetTaskActionCommand, TaskActionCompute,
    TaskActionInput, TaskActionKind, TaskEditorInput, TaskListCompute, TaskListQuery,
    TaskPriority, TaskResponse, TaskStatus,
};

use crate::state::State;
use crate::widgets::table::{ColumnWidth, SortKey, TableColumn};

const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);
const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// A row button clicked during table rendering, applied once the table
/// is done drawing.
#[derive(Clone, Copy)]
enum RowAction {
    Edit(i64),
    Delete(i64),
}

/// Column definitions for the tasks table. Sorting is in-page cosmetics;
/// the fetched order itself comes from [`TaskListQuery`].
pub fn task_table_columns() -> Vec<TableColumn<TaskResponse>> {
    vec![
        TableColumn::new("id", "ID", ColumnWidth::Exact(60.0))
            .sortable(|task: &TaskResponse| SortKey::number(task.id)),
        TableColumn::new("title", "Title", ColumnWidth::Remainder { at_least: 160.0 })
            .sortable(|task: &TaskResponse| SortKey::text(&task.title)),
        TableColumn::new("status", "Status", ColumnWidth::Exact(110.0))
            .sortable(|task: &TaskResponse| SortKey::number(task.status as i64)),
        TableColumn::new("priority", "Priority", ColumnWidth::Exact(90.0))
            .sortable(|task: &TaskResponse| SortKey::number(task.priority as i64)),
        TableColumn::new("owner", "Owner", ColumnWidth::Exact(120.0)),
        TableColumn::new("created", "Created", ColumnWidth::Exact(130.0))
            .sortable(|task: &TaskResponse| SortKey::number(task.created_at.and_utc().timestamp())),
        TableColumn::new("actions", "Actions", ColumnWidth::Exact(130.0)),
    ]
}

/// Renders the task table with its toolbar and the delete confirmation.
pub fn tasks_page(state: &mut State, ui: &mut Ui) -> Response {
    let query = state.ctx.state::<TaskListQuery>().clone();

    let mut is_loading = false;
    let mut error: Option<String> = None;
    let mut rows: Vec<TaskResponse> = Vec::new();

    if let Some(compute) = state.ctx.cached::<TaskListCompute>() {
        if compute.is_stale(&query) {
            state.ctx.dispatch::<RefreshTasksCommand>();
        }
        is_loading = compute.is_loading();
        error = compute.error_message().map(String::from);
        if let Some(page) = compute.page() {
            state.tasks_table.set_server_window(
                page.page,
                page.size,
                page.total_pages,
                Some(page.total_elements),
            );
            rows = page.content.clone();
        }
    }

    handle_delete_outcome(state);

    let mut row_action: Option<RowAction> = None;

    let response = ui
        .vertical(|ui| {
            ui.horizontal(|ui| {
                ui.heading("Tasks");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("New Task").clicked() {
                        state
                            .ctx
                            .update::<TaskEditorInput>(|input| input.reset_for_create());
                        state.ctx.update::<Route>(|route| *route = Route::TaskNew);
                    }
                });
            });
            ui.add_space(8.0);

            if let Some(err) = &error {
                ui.colored_label(COLOR_RED, err);
                ui.add_space(4.0);
            }

            let table_response =
                state
                    .tasks_table
                    .show(ui, &rows, is_loading, |ui, task, column| {
                        render_task_cell(ui, task, column, &mut row_action);
                    });

            if let Some(request) = table_response.page_requested {
                state.ctx.update::<TaskListQuery>(|query| {
                    query.page = request.index;
                    query.size = request.size;
                });
            }
            if let Some(search) = table_response.search_changed {
                state.ctx.update::<TaskListQuery>(|query| {
                    query.search = search;
                    // A narrower search starts over from the first page.
                    query.page = 0;
                });
            }
        })
        .response;

    if let Some(action) = row_action {
        match action {
            RowAction::Edit(id) => {
                state
                    .ctx
                    .update::<TaskEditorInput>(|input| input.reset_for_edit(id));
                state.ctx.update::<Route>(|route| *route = Route::TaskEdit(id));
            }
            RowAction::Delete(id) => {
                state
                    .ctx
                    .update::<TaskActionInput>(|input| input.pending_delete = Some(id));
            }
        }
    }

    show_delete_confirm(state, ui);

    response
}

#[inline]
fn render_task_cell(
    ui: &mut Ui,
    task: &TaskResponse,
    column: &'static str,
    action: &mut Option<RowAction>,
) {
    match column {
        "id" => {
            ui.label(RichText::new(task.id.to_string()).monospace());
        }
        "title" => {
            let response = ui.label(&task.title);
            if let Some(description) = &task.description {
                response.on_hover_text(description);
            }
        }
        "status" => {
            ui.colored_label(status_color(task.status), task.status.label());
        }
        "priority" => {
            ui.colored_label(priority_color(task.priority), task.priority.label());
        }
        "owner" => {
            ui.label(&task.user_name);
        }
        "created" => {
            ui.label(task.created_at.format("%Y-%m-%d %H:%M").to_string());
        }
        "actions" => {
            if ui.small_button("Edit").clicked() {
                *action = Some(RowAction::Edit(task.id));
            }
            if ui.small_button("Delete").clicked() {
                *action = Some(RowAction::Delete(task.id));
            }
        }
        _ => {}
    }
}

fn status_color(status: TaskStatus) -> Color32 {
    match status {
        TaskStatus::Pending => Color32::GRAY,
        TaskStatus::Todo => Color32::from_rgb(200, 200, 200),
        TaskStatus::InProgress => Color32::LIGHT_BLUE,
        TaskStatus::Done => COLOR_GREEN,
    }
}

fn priority_color(priority: TaskPriority) -> Color32 {
    match priority {
        TaskPriority::Low => COLOR_GREEN,
        TaskPriority::Medium => Color32::from_rgb(255, 165, 0),
        TaskPriority::High => COLOR_RED,
    }
}

/// A finished delete clears the pending id and the replayed outcome. The
/// list cache was already reset by the command, so the table refetches on
/// its own.
fn handle_delete_outcome(state: &mut State) {
    let succeeded = state
        .ctx
        .cached::<TaskActionCompute>()
        .and_then(|compute| compute.succeeded());
    if succeeded == Some(TaskActionKind::Delete) {
        state
            .ctx
            .update::<TaskActionInput>(|input| input.pending_delete = None);
        state.ctx.dispatch::<ResetTaskActionCommand>();
    }
}

/// Modal-style confirmation for a pending delete.
fn show_delete_confirm(state: &mut State, ui: &Ui) {
    let Some(id) = state.ctx.state::<TaskActionInput>().pending_delete else {
        return;
    };
    let (in_flight, error) = state
        .ctx
        .cached::<TaskActionCompute>()
        .map(|compute| {
            (
                compute.is_in_flight(),
                compute.error_message().map(String::from),
            )
        })
        .unwrap_or((false, None));

    let mut confirm = false;
    let mut cancel = false;
    egui::Window::new("Delete task")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ui.ctx(), |ui| {
            ui.label(format!("Delete task #{id}? This cannot be undone."));
            if let Some(err) = &error {
                ui.colored_label(COLOR_RED, err);
            }
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if in_flight {
                    ui.spinner();
                    ui.label("Deleting...");
                } else {
                    if ui.button("Delete").clicked() {
                        confirm = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                }
            });
        });

    if confirm {
        state.ctx.dispatch::<DeleteTaskCommand>();
    }
    if cancel {
        state
            .ctx
            .update::<TaskActionInput>(|input| input.pending_delete = None);
        state.ctx.dispatch::<ResetTaskActionCommand>();
    }
}
