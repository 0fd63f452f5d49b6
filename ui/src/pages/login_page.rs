//! Login page for anonymous users.
//!
//! Carries both credential forms: sign-in (email and password) and sign-up
//! (additionally a display name). The active form is part of
//! [`CredentialsInput`] so it survives the frame.

use egui::{Align, Color32, Layout, Response, RichText, Ui};
use taskdeck_business::auth::{
    AuthCompute, AuthStatus, CredentialsInput, CredentialsMode, SignInCommand, SignUpCommand,
};

use crate::state::State;

/// Green color for success status
const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);
/// Red color for error status
const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Renders the credential forms, a spinner while a call is in flight, or a
/// short welcome while the post-login redirect lands.
pub fn login_page(state: &mut State, ui: &mut Ui) -> Response {
    let auth_status = state
        .ctx
        .cached::<AuthCompute>()
        .map(|compute| compute.status.clone())
        .unwrap_or_default();

    match auth_status {
        AuthStatus::Authenticated { user } => show_signed_in(ui, &user.name),
        AuthStatus::Authenticating => show_loading(ui),
        AuthStatus::Failed(error) => show_credentials_form(state, ui, Some(&error)),
        AuthStatus::Anonymous => show_credentials_form(state, ui, None),
    }
}

fn show_signed_in(ui: &mut Ui, name: &str) -> Response {
    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        ui.add_space(20.0);
        ui.heading("Taskdeck");
        ui.add_space(40.0);

        ui.label(RichText::new("Signed in").size(24.0).color(COLOR_GREEN));
        ui.add_space(8.0);
        ui.label(format!("Welcome, {name}"));
    })
    .response
}

fn show_loading(ui: &mut Ui) -> Response {
    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        ui.add_space(20.0);
        ui.heading("Taskdeck");
        ui.add_space(40.0);

        ui.spinner();
        ui.label("Signing in...");
    })
    .response
}

/// Shows the sign-in or sign-up form with an optional error message.
fn show_credentials_form(state: &mut State, ui: &mut Ui, error: Option<&str>) -> Response {
    let input = state.ctx.state_mut::<CredentialsInput>();

    let mut mode = input.mode;
    let mut email = input.email.clone();
    let mut password = input.password.clone();
    let mut name = input.name.clone();
    let mut should_submit = false;

    let response = ui
        .with_layout(Layout::top_down(Align::Center), |ui| {
            ui.add_space(20.0);
            ui.heading("Taskdeck");
            ui.add_space(24.0);

            ui.horizontal(|ui| {
                if ui
                    .selectable_label(mode == CredentialsMode::SignIn, "Sign in")
                    .clicked()
                {
                    mode = CredentialsMode::SignIn;
                }
                if ui
                    .selectable_label(mode == CredentialsMode::SignUp, "Sign up")
                    .clicked()
                {
                    mode = CredentialsMode::SignUp;
                }
            });

            ui.add_space(16.0);

            if let Some(err) = error {
                ui.colored_label(COLOR_RED, err);
                ui.add_space(8.0);
            }

            if mode == CredentialsMode::SignUp {
                ui.horizontal(|ui| {
                    ui.label("Name:");
                    ui.text_edit_singleline(&mut name);
                });
                ui.add_space(8.0);
            }

            ui.horizontal(|ui| {
                ui.label("Email:");
                ui.text_edit_singleline(&mut email);
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Password:");
                let password_response =
                    ui.add(egui::TextEdit::singleline(&mut password).password(true));

                // Check for Enter key press
                if password_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
                {
                    should_submit = true;
                }
            });

            ui.add_space(16.0);

            let mut can_submit = !email.trim().is_empty() && !password.is_empty();
            let button_label = match mode {
                CredentialsMode::SignIn => "Sign in",
                CredentialsMode::SignUp => {
                    can_submit &= !name.trim().is_empty();
                    "Create account"
                }
            };
            if ui
                .add_enabled(can_submit, egui::Button::new(button_label))
                .clicked()
            {
                should_submit = true;
            }
        })
        .response;

    // Update state if values changed
    let input = state.ctx.state_mut::<CredentialsInput>();
    if input.mode != mode {
        input.mode = mode;
    }
    if input.email != email {
        input.email = email;
    }
    if input.password != password {
        input.password = password;
    }
    if input.name != name {
        input.name = name;
    }

    if should_submit {
        match mode {
            CredentialsMode::SignIn => state.ctx.dispatch::<SignInCommand>(),
            CredentialsMode::SignUp => state.ctx.dispatch::<SignUpCommand>(),
        }
    }

    response
}
