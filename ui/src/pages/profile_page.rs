//! Profile page for the signed-in user.
//!
//! Shows the account identity read-only, lets the user rename themselves and
//! change their password. The name field prefills from the fetched profile
//! once; passwords always start out blank.

use egui::{Color32, Response, RichText, Ui};
use taskdeck_business::profile::{
    LoadProfileCommand, ProfileActionCompute, ProfileCompute, ProfileInput, UpdateProfileCommand,
};

use crate::state::State;

const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);
const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

pub fn profile_page(state: &mut State, ui: &mut Ui) -> Response {
    let hydrated = state.ctx.state::<ProfileInput>().hydrated;

    let mut loading = false;
    let mut load_error: Option<String> = None;
    let mut profile_user = None;
    let mut hydrate_user = None;

    if let Some(compute) = state.ctx.cached::<ProfileCompute>() {
        if compute.needs_fetch() {
            state.ctx.dispatch::<LoadProfileCommand>();
        }
        loading = compute.is_loading();
        load_error = compute.error_message().map(String::from);
        profile_user = compute.user().cloned();
        if !hydrated && let Some(user) = compute.user() {
            hydrate_user = Some(user.clone());
        }
    }

    if let Some(user) = hydrate_user {
        state
            .ctx
            .update::<ProfileInput>(|input| input.hydrate_from(&user));
    }

    let action = state.ctx.cached::<ProfileActionCompute>();
    let in_flight = action.map(|compute| compute.is_in_flight()).unwrap_or(false);
    let saved = action.map(|compute| compute.succeeded()).unwrap_or(false);
    let action_error = action.and_then(|compute| compute.error_message().map(String::from));
    let current_password_error =
        action.and_then(|compute| compute.field_message("currentPassword").map(String::from));
    let new_password_error =
        action.and_then(|compute| compute.field_message("newPassword").map(String::from));

    let input = state.ctx.state_mut::<ProfileInput>();
    let mut name = input.name.clone();
    let mut current_password = input.current_password.clone();
    let mut new_password = input.new_password.clone();
    let mut should_save = false;

    let response = ui
        .vertical(|ui| {
            ui.heading("Profile");
            ui.add_space(12.0);

            if loading && profile_user.is_none() {
                ui.spinner();
                ui.label("Loading profile...");
                return;
            }
            if let Some(err) = &load_error {
                ui.colored_label(COLOR_RED, err);
                ui.add_space(8.0);
            }

            if let Some(user) = &profile_user {
                egui::Grid::new("profile_identity")
                    .num_columns(2)
                    .spacing([16.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Email:");
                        ui.label(RichText::new(&user.email).monospace());
                        ui.end_row();

                        ui.label("Role:");
                        ui.label(user.role.label());
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
            if saved {
                ui.colored_label(COLOR_GREEN, "Profile updated");
                ui.add_space(8.0);
            }

            ui.horizontal(|ui| {
                ui.label("Name:");
                ui.text_edit_singleline(&mut name);
            });

            ui.add_space(12.0);
            ui.separator();
            ui.strong("Change password");
            ui.label("Leave blank to keep the current password.");
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Current password:");
                ui.add(egui::TextEdit::singleline(&mut current_password).password(true));
            });
            if let Some(err) = &current_password_error {
                ui.colored_label(COLOR_RED, err);
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label("New password:");
                ui.add(egui::TextEdit::singleline(&mut new_password).password(true));
            });
            if let Some(err) = &new_password_error {
                ui.colored_label(COLOR_RED, err);
            }

            ui.add_space(16.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!in_flight, egui::Button::new("Save"))
                    .clicked()
                {
                    should_save = true;
                }
                if in_flight {
                    ui.spinner();
                    ui.label("Saving...");
                }
            });
        })
        .response;

    // Update state if values changed
    let input = state.ctx.state_mut::<ProfileInput>();
    if input.name != name {
        input.name = name;
    }
    if input.current_password != current_password {
        input.current_password = current_password;
    }
    if input.new_password != new_password {
        input.new_password = new_password;
    }

    // A landed password change empties the password fields; the guard keeps
    // this from re-running while the success banner is still up.
    if saved && (!input.current_password.is_empty() || !input.new_password.is_empty()) {
        input.current_password.clear();
        input.new_password.clear();
    }

    if should_save {
        state.ctx.dispatch::<UpdateProfileCommand>();
    }

    response
}
