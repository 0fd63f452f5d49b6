//! Admin user management table.
//!
//! The directory endpoint hands back every user, so this table pages and
//! filters locally. The search box matches name and email; deletes go
//! through the same confirm-then-dispatch shape as the tasks page.

use egui::{Color32, Response, RichText, Ui};
use taskdeck_business::admin::{
    AdminActionCompute, AdminActionInput, AdminActionKind, AdminUserEditInput, AdminUserResponse,
    AdminUsersCompute, DeleteAdminUserCommand, RefreshAdminUsersCommand, ResetAdminActionCommand,
    UserStatus,
};
use taskdeck_business::{Role, Route};

use crate::state::State;
use crate::widgets::table::{ColumnWidth, SortKey, TableColumn};

const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);
const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Rows per locally-computed page.
pub const USERS_PAGE_SIZE: u64 = 10;

/// A row button clicked during table rendering, applied once the table
/// is done drawing.
#[derive(Clone, Copy)]
enum RowAction {
    Edit(i64),
    Delete(i64),
}

/// Column definitions for the users table. The name column carries the
/// search extractor; it matches the email too, like the server-side task
/// search matches descriptions.
pub fn admin_user_table_columns() -> Vec<TableColumn<AdminUserResponse>> {
    vec![
        TableColumn::new("id", "ID", ColumnWidth::Exact(60.0))
            .sortable(|user: &AdminUserResponse| SortKey::number(user.id)),
        TableColumn::new("name", "Name", ColumnWidth::Remainder { at_least: 140.0 })
            .sortable(|user: &AdminUserResponse| SortKey::text(&user.name))
            .filterable(|user: &AdminUserResponse| format!("{} {}", user.name, user.email)),
        TableColumn::new("email", "Email", ColumnWidth::Remainder { at_least: 180.0 })
            .sortable(|user: &AdminUserResponse| SortKey::text(&user.email)),
        TableColumn::new("role", "Role", ColumnWidth::Exact(80.0))
            .sortable(|user: &AdminUserResponse| SortKey::number(user.role as i64)),
        TableColumn::new("status", "Status", ColumnWidth::Exact(100.0))
            .sortable(|user: &AdminUserResponse| SortKey::number(user.status as i64)),
        TableColumn::new("created", "Created", ColumnWidth::Exact(130.0))
            .sortable(|user: &AdminUserResponse| SortKey::number(user.created_at.and_utc().timestamp())),
        TableColumn::new("actions", "Actions", ColumnWidth::Exact(130.0)),
    ]
}

pub fn admin_users_page(state: &mut State, ui: &mut Ui) -> Response {
    let mut is_loading = false;
    let mut error: Option<String> = None;
    let mut rows: Vec<AdminUserResponse> = Vec::new();

    if let Some(compute) = state.ctx.cached::<AdminUsersCompute>() {
        if compute.needs_fetch() {
            state.ctx.dispatch::<RefreshAdminUsersCommand>();
        }
        is_loading = compute.is_loading();
        error = compute.error_message().map(String::from);
        rows = compute.users().to_vec();
    }

    handle_delete_outcome(state);

    let mut row_action: Option<RowAction> = None;

    let response = ui
        .vertical(|ui| {
            ui.horizontal(|ui| {
                ui.heading("Users");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add_enabled(!is_loading, egui::Button::new("Refresh"))
                        .clicked()
                    {
                        state.ctx.dispatch::<RefreshAdminUsersCommand>();
                    }
                });
            });
            ui.add_space(8.0);

            if let Some(err) = &error {
                ui.colored_label(COLOR_RED, err);
                ui.add_space(4.0);
            }

            state
                .admin_users_table
                .show(ui, &rows, is_loading, |ui, user, column| {
                    render_user_cell(ui, user, column, &mut row_action);
                });
        })
        .response;

    if let Some(action) = row_action {
        match action {
            RowAction::Edit(id) => {
                state
                    .ctx
                    .update::<AdminUserEditInput>(|input| input.reset_for(id));
                state
                    .ctx
                    .update::<Route>(|route| *route = Route::AdminUserEdit(id));
            }
            RowAction::Delete(id) => {
                state
                    .ctx
                    .update::<AdminActionInput>(|input| input.pending_delete = Some(id));
            }
        }
    }

    show_delete_confirm(state, ui);

    response
}

#[inline]
fn render_user_cell(
    ui: &mut Ui,
    user: &AdminUserResponse,
    column: &'static str,
    action: &mut Option<RowAction>,
) {
    match column {
        "id" => {
            ui.label(RichText::new(user.id.to_string()).monospace());
        }
        "name" => {
            ui.label(&user.name);
        }
        "email" => {
            ui.label(&user.email);
        }
        "role" => match user.role {
            Role::Admin => {
                ui.colored_label(Color32::LIGHT_BLUE, user.role.label());
            }
            Role::User => {
                ui.label(user.role.label());
            }
        },
        "status" => {
            ui.colored_label(status_color(user.status), user.status.label());
        }
        "created" => {
            ui.label(user.created_at.format("%Y-%m-%d %H:%M").to_string());
        }
        "actions" => {
            if ui.small_button("Edit").clicked() {
                *action = Some(RowAction::Edit(user.id));
            }
            if ui.small_button("Delete").clicked() {
                *action = Some(RowAction::Delete(user.id));
            }
        }
        _ => {}
    }
}

fn status_color(status: UserStatus) -> Color32 {
    match status {
        UserStatus::Active => COLOR_GREEN,
        UserStatus::Inactive => Color32::GRAY,
        UserStatus::Suspended => COLOR_RED,
    }
}

/// A finished delete clears the pending id and the replayed outcome; the
/// directory cache was reset by the command.
fn handle_delete_outcome(state: &mut State) {
    let succeeded = state
        .ctx
        .cached::<AdminActionCompute>()
        .and_then(|compute| compute.succeeded());
    if succeeded == Some(AdminActionKind::Delete) {
        state
            .ctx
            .update::<AdminActionInput>(|input| input.pending_delete = None);
        state.ctx.dispatch::<ResetAdminActionCommand>();
    }
}

fn show_delete_confirm(state: &mut State, ui: &Ui) {
    let Some(id) = state.ctx.state::<AdminActionInput>().pending_delete else {
        return;
    };
    let (in_flight, error) = state
        .ctx
        .cached::<AdminActionCompute>()
        .map(|compute| {
            (
                compute.is_in_flight(),
                compute.error_message().map(String::from),
            )
        })
        .unwrap_or((false, None));

    let mut confirm = false;
    let mut cancel = false;
    egui::Window::new("Delete user")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ui.ctx(), |ui| {
            ui.label(format!(
                "Delete user #{id}? Their tasks are removed as well."
            ));
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
        state.ctx.dispatch::<DeleteAdminUserCommand>();
    }
    if cancel {
        state
            .ctx
            .update::<AdminActionInput>(|input| input.pending_delete = None);
        state.ctx.dispatch::<ResetAdminActionCommand>();
    }
}
