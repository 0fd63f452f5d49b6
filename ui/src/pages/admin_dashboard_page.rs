//! Admin dashboard with aggregate counters.

use egui::{Color32, Response, RichText, Ui};
use taskdeck_business::admin::{AdminDashboardCompute, LoadAdminDashboardCommand};

use crate::state::State;

const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

pub fn admin_dashboard_page(state: &mut State, ui: &mut Ui) -> Response {
    let mut loading = false;
    let mut error: Option<String> = None;
    let mut stats = None;

    if let Some(compute) = state.ctx.cached::<AdminDashboardCompute>() {
        if compute.needs_fetch() {
            state.ctx.dispatch::<LoadAdminDashboardCommand>();
        }
        loading = compute.is_loading();
        error = compute.error_message().map(String::from);
        stats = compute.stats().cloned();
    }

    ui.vertical(|ui| {
        ui.horizontal(|ui| {
            ui.heading("Dashboard");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!loading, egui::Button::new("Refresh"))
                    .clicked()
                {
                    state.ctx.dispatch::<LoadAdminDashboardCommand>();
                }
            });
        });
        ui.add_space(12.0);

        if let Some(err) = &error {
            ui.colored_label(COLOR_RED, err);
            ui.add_space(8.0);
        }

        if loading && stats.is_none() {
            ui.spinner();
            ui.label("Loading counters...");
            return;
        }
        let Some(stats) = stats else {
            return;
        };

        ui.strong("Users");
        ui.add_space(4.0);
        egui::Grid::new("dashboard_users")
            .num_columns(2)
            .spacing([24.0, 6.0])
            .striped(true)
            .show(ui, |ui| {
                stat_row(ui, "Total", stats.total_users);
                stat_row(ui, "Active", stats.active_users);
                stat_row(ui, "Inactive", stats.inactive_users);
                stat_row(ui, "Suspended", stats.suspended_users);
                stat_row(ui, "New today", stats.today_new_users);
            });

        ui.add_space(16.0);
        ui.strong("Tasks");
        ui.add_space(4.0);
        egui::Grid::new("dashboard_tasks")
            .num_columns(2)
            .spacing([24.0, 6.0])
            .striped(true)
            .show(ui, |ui| {
                stat_row(ui, "Total", stats.total_tasks);
                stat_row(ui, "To do", stats.todo_tasks);
                stat_row(ui, "In progress", stats.in_progress_tasks);
                stat_row(ui, "Done", stats.done_tasks);
            });
    })
    .response
}

fn stat_row(ui: &mut Ui, label: &str, value: u64) {
    ui.label(label);
    ui.label(RichText::new(value.to_string()).monospace().strong());
    ui.end_row();
}
