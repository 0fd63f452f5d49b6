//! Create and edit form for a single task.
//!
//! Serves both `Route::TaskNew` and `Route::TaskEdit`. Edit mode fetches the
//! server copy once and hydrates the fields from it; after that the form owns
//! the values until save.

use egui::{Color32, Response, Ui};
use taskdeck_business::Route;
use taskdeck_business::tasks::{
    LoadTaskCommand, ResetTaskActionCommand, SaveTaskCommand, TaskActionCompute, TaskActionKind,
    TaskEditorCompute, TaskEditorInput, TaskFormValidation, TaskPriority, TaskStatus,
};

use crate::state::State;

const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

pub fn task_form_page(state: &mut State, ui: &mut Ui) -> Response {
    let editing_id = state.ctx.state::<TaskEditorInput>().editing_id;

    let action = state.ctx.cached::<TaskActionCompute>();
    let in_flight = action.map(|compute| compute.is_in_flight()).unwrap_or(false);
    let action_error = action.and_then(|compute| compute.error_message().map(String::from));
    let title_server_error =
        action.and_then(|compute| compute.field_message("title").map(String::from));
    let succeeded = action.and_then(|compute| compute.succeeded());

    // Back to the list once the save lands; the command already reset the
    // list cache so the table refetches. Leaving before the staleness check
    // below keeps the reset editor cache from refetching the task on the
    // way out.
    if matches!(
        succeeded,
        Some(TaskActionKind::Create | TaskActionKind::Update)
    ) {
        state.ctx.dispatch::<ResetTaskActionCommand>();
        state.ctx.update::<Route>(|route| *route = Route::Tasks);
        return ui.spinner();
    }

    if let Some(id) = editing_id {
        let needs_hydration = state.ctx.state::<TaskEditorInput>().needs_hydration();
        let mut hydrate_task = None;
        let mut loading = false;
        let mut load_error: Option<String> = None;

        if let Some(compute) = state.ctx.cached::<TaskEditorCompute>() {
            if compute.is_stale(id) {
                state.ctx.dispatch::<LoadTaskCommand>();
            }
            loading = compute.is_loading();
            load_error = compute.error_message().map(String::from);
            if needs_hydration
                && let Some(task) = compute.task()
                && task.id == id
            {
                hydrate_task = Some(task.clone());
            }
        }

        if let Some(task) = hydrate_task {
            state
                .ctx
                .update::<TaskEditorInput>(|input| input.hydrate_from(&task));
        }

        if loading {
            return ui
                .vertical(|ui| {
                    ui.heading("Edit Task");
                    ui.add_space(12.0);
                    ui.spinner();
                    ui.label("Loading task...");
                })
                .response;
        }
        if let Some(err) = load_error {
            return ui
                .vertical(|ui| {
                    ui.heading("Edit Task");
                    ui.add_space(12.0);
                    ui.colored_label(COLOR_RED, err);
                    ui.add_space(8.0);
                    if ui.button("Back").clicked() {
                        state.ctx.update::<Route>(|route| *route = Route::Tasks);
                    }
                })
                .response;
        }
    }

    let validation = state
        .ctx
        .cached::<TaskFormValidation>()
        .cloned()
        .unwrap_or_default();

    let input = state.ctx.state_mut::<TaskEditorInput>();
    let mut title = input.title.clone();
    let mut description = input.description.clone();
    let mut status = input.status;
    let mut priority = input.priority;
    let mut should_save = false;
    let mut should_cancel = false;

    let heading = if editing_id.is_some() {
        "Edit Task"
    } else {
        "New Task"
    };

    let response = ui
        .vertical(|ui| {
            ui.heading(heading);
            ui.add_space(12.0);

            if let Some(err) = &action_error {
                ui.colored_label(COLOR_RED, err);
                ui.add_space(8.0);
            }

            ui.horizontal(|ui| {
                ui.label("Title:");
                ui.text_edit_singleline(&mut title);
            });
            if let Some(err) = validation
                .title_error
                .as_deref()
                .or(title_server_error.as_deref())
            {
                ui.colored_label(COLOR_RED, err);
            }
            ui.add_space(8.0);

            ui.label("Description:");
            ui.text_edit_multiline(&mut description);
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Status:");
                egui::ComboBox::from_id_salt("task_status")
                    .selected_text(status.label())
                    .show_ui(ui, |ui| {
                        for option in TaskStatus::ALL {
                            ui.selectable_value(&mut status, option, option.label());
                        }
                    });
                ui.add_space(12.0);
                ui.label("Priority:");
                egui::ComboBox::from_id_salt("task_priority")
                    .selected_text(priority.label())
                    .show_ui(ui, |ui| {
                        for option in TaskPriority::ALL {
                            ui.selectable_value(&mut priority, option, option.label());
                        }
                    });
            });

            ui.add_space(16.0);
            ui.horizontal(|ui| {
                let can_save = validation.is_valid() && !in_flight;
                let save_label = if editing_id.is_some() { "Save" } else { "Create" };
                if ui
                    .add_enabled(can_save, egui::Button::new(save_label))
                    .clicked()
                {
                    should_save = true;
                }
                if ui.button("Cancel").clicked() {
                    should_cancel = true;
                }
                if in_flight {
                    ui.spinner();
                    ui.label("Saving...");
                }
            });
        })
        .response;

    // Update state if values changed
    let input = state.ctx.state_mut::<TaskEditorInput>();
    if input.title != title {
        input.title = title;
    }
    if input.description != description {
        input.description = description;
    }
    if input.status != status {
        input.status = status;
    }
    if input.priority != priority {
        input.priority = priority;
    }

    if should_save {
        state.ctx.dispatch::<SaveTaskCommand>();
    }
    if should_cancel {
        state.ctx.update::<Route>(|route| *route = Route::Tasks);
    }

    response
}
