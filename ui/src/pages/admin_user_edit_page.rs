//! Role and status form for one user, admin only.
//!
//! The route carries the target id; the page re-points the form whenever
//! they disagree, so a stale form can never save under the wrong user.

use egui::{Color32, Response, RichText, Ui};
use taskdeck_business::admin::{
    AdminActionCompute, AdminActionKind, AdminUserEditCompute, AdminUserEditInput,
    LoadAdminUserCommand, ResetAdminActionCommand, UpdateAdminUserCommand, UserStatus,
};
use taskdeck_business::{Role, Route};

use crate::state::State;

const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

pub fn admin_user_edit_page(state: &mut State, ui: &mut Ui, id: i64) -> Response {
    let action = state.ctx.cached::<AdminActionCompute>();
    let in_flight = action.map(|compute| compute.is_in_flight()).unwrap_or(false);
    let action_error = action.and_then(|compute| compute.error_message().map(String::from));
    let succeeded = action.and_then(|compute| compute.succeeded());

    // Back to the directory once the update lands; the command already reset
    // the directory cache. Leaving before the staleness check below keeps the
    // reset edit cache from refetching the account on the way out.
    if succeeded == Some(AdminActionKind::Update) {
        state.ctx.dispatch::<ResetAdminActionCommand>();
        state.ctx.update::<Route>(|route| *route = Route::AdminUsers);
        return ui.spinner();
    }

    if state.ctx.state::<AdminUserEditInput>().user_id != Some(id) {
        state
            .ctx
            .update::<AdminUserEditInput>(|input| input.reset_for(id));
    }

    let needs_hydration = state.ctx.state::<AdminUserEditInput>().needs_hydration();
    let mut loading = false;
    let mut load_error: Option<String> = None;
    let mut edited_user = None;
    let mut hydrate_user = None;

    if let Some(compute) = state.ctx.cached::<AdminUserEditCompute>() {
        if compute.is_stale(id) {
            state.ctx.dispatch::<LoadAdminUserCommand>();
        }
        loading = compute.is_loading();
        load_error = compute.error_message().map(String::from);
        edited_user = compute.user().cloned();
        if needs_hydration
            && let Some(user) = compute.user()
            && user.id == id
        {
            hydrate_user = Some(user.clone());
        }
    }

    if let Some(user) = hydrate_user {
        state
            .ctx
            .update::<AdminUserEditInput>(|input| input.hydrate_from(&user));
    }

    if loading {
        return ui
            .vertical(|ui| {
                ui.heading("Edit User");
                ui.add_space(12.0);
                ui.spinner();
                ui.label("Loading user...");
            })
            .response;
    }
    if let Some(err) = load_error {
        return ui
            .vertical(|ui| {
                ui.heading("Edit User");
                ui.add_space(12.0);
                ui.colored_label(COLOR_RED, err);
                ui.add_space(8.0);
                if ui.button("Back").clicked() {
                    state.ctx.update::<Route>(|route| *route = Route::AdminUsers);
                }
            })
            .response;
    }

    let input = state.ctx.state_mut::<AdminUserEditInput>();
    let mut role = input.role;
    let mut status = input.status;
    let mut should_save = false;
    let mut should_back = false;

    let response = ui
        .vertical(|ui| {
            ui.heading("Edit User");
            ui.add_space(12.0);

            if let Some(user) = &edited_user {
                egui::Grid::new("admin_user_identity")
                    .num_columns(2)
                    .spacing([16.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Name:");
                        ui.label(&user.name);
                        ui.end_row();

                        ui.label("Email:");
                        ui.label(RichText::new(&user.email).monospace());
                        ui.end_row();

                        ui.label("Member since:");
                        ui.label(user.created_at.format("%Y-%m-%d").to_string());
                        ui.end_row();
                    });
                ui.add_space(12.0);
            }

            if let Some(err) = &action_error {
                ui.colored_label(COLOR_RED, err);
                ui.add_space(8.0);
            }

            ui.horizontal(|ui| {
                ui.label("Role:");
                egui::ComboBox::from_id_salt("admin_user_role")
                    .selected_text(role.label())
                    .show_ui(ui, |ui| {
                        for option in [Role::User, Role::Admin] {
                            ui.selectable_value(&mut role, option, option.label());
                        }
                    });
                ui.add_space(12.0);
                ui.label("Status:");
                egui::ComboBox::from_id_salt("admin_user_status")
                    .selected_text(status.label())
                    .show_ui(ui, |ui| {
                        for option in UserStatus::ALL {
                            ui.selectable_value(&mut status, option, option.label());
                        }
                    });
            });

            ui.add_space(16.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!in_flight, egui::Button::new("Save"))
                    .clicked()
                {
                    should_save = true;
                }
                if ui.button("Back").clicked() {
                    should_back = true;
                }
                if in_flight {
                    ui.spinner();
                    ui.label("Saving...");
                }
            });
        })
        .response;

    // Update state if values changed
    let input = state.ctx.state_mut::<AdminUserEditInput>();
    if input.role != role {
        input.role = role;
    }
    if input.status != status {
        input.status = status;
    }

    if should_save {
        state.ctx.dispatch::<UpdateAdminUserCommand>();
    }
    if should_back {
        state.ctx.update::<Route>(|route| *route = Route::AdminUsers);
    }

    response
}
