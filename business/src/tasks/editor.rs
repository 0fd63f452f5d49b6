//! Task form state, validation and edit-mode loading.
//!
//! The editor serves both `/tasks/new` and `/tasks/{id}/edit`. In edit mode
//! the page dispatches [`LoadTaskCommand`] and copies the fetched task into
//! the form exactly once; [`TaskFormValidation`] re-derives from the fields on
//! every change.

use std::any::Any;

use log::{error, info};
use taskdeck_states::{
    Command, Compute, ComputeDeps, ComputeStage, Dep, State, Updater, assign_impl,
};

use crate::client::ApiClient;
use crate::error::extract_error_message;
use crate::tasks::types::{TaskPriority, TaskRequest, TaskResponse, TaskStatus};

/// Input state for the task form.
#[derive(Default, Debug, Clone)]
pub struct TaskEditorInput {
    /// `None` when creating, the task id when editing.
    pub editing_id: Option<i64>,
    /// Title entered by the user.
    pub title: String,
    /// Description entered by the user.
    pub description: String,
    /// Status picked in the select.
    pub status: TaskStatus,
    /// Priority picked in the select.
    pub priority: TaskPriority,
    /// The id whose server copy has been copied into the fields, so the edit
    /// page hydrates the form exactly once per task.
    pub hydrated_for: Option<i64>,
}

impl TaskEditorInput {
    /// Clear the form for creating a new task.
    pub fn reset_for_create(&mut self) {
        *self = Self::default();
    }

    /// Point the form at an existing task; fields fill once the fetch lands.
    pub fn reset_for_edit(&mut self, id: i64) {
        *self = Self {
            editing_id: Some(id),
            ..Self::default()
        };
    }

    /// Copy the server copy of the task into the editable fields.
    pub fn hydrate_from(&mut self, task: &TaskResponse) {
        self.title = task.title.clone();
        self.description = task.description.clone().unwrap_or_default();
        self.status = task.status;
        self.priority = task.priority;
        self.hydrated_for = Some(task.id);
    }

    /// True while an edit form still shows blank fields for its task.
    pub fn needs_hydration(&self) -> bool {
        self.editing_id.is_some() && self.editing_id != self.hydrated_for
    }

    /// The request payload the form currently describes.
    pub fn to_request(&self) -> TaskRequest {
        let description = self.description.trim();
        TaskRequest {
            title: self.title.trim().to_string(),
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            status: self.status,
            priority: self.priority,
        }
    }
}

impl State for TaskEditorInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Derived validation verdict for the task form.
///
/// Re-derives whenever [`TaskEditorInput`] changes; the save button disables
/// while `is_valid()` is false and the title field shows `title_error`.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TaskFormValidation {
    pub title_error: Option<String>,
}

impl TaskFormValidation {
    fn for_input(input: &TaskEditorInput) -> Self {
        let title = input.title.trim();
        let title_error = if title.is_empty() {
            Some("Title is required".to_string())
        } else if title.chars().count() > 255 {
            Some("Title must be less than 255 characters".to_string())
        } else {
            None
        };
        Self { title_error }
    }

    pub fn is_valid(&self) -> bool {
        self.title_error.is_none()
    }
}

impl Compute for TaskFormValidation {
    fn deps(&self) -> ComputeDeps {
        const STATE_IDS: [std::any::TypeId; 1] = [std::any::TypeId::of::<TaskEditorInput>()];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, deps: Dep, updater: Updater) -> ComputeStage {
        let input = deps.get_state_ref::<TaskEditorInput>();
        let derived = Self::for_input(input);
        // Fields change on every keystroke; only publish a changed verdict.
        if derived == *self {
            return ComputeStage::Finished;
        }
        updater.set(derived);
        ComputeStage::Pending
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any>) {
        assign_impl(self, new_self);
    }
}

/// Status/result of loading a task into the edit form.
#[derive(Debug, Clone, Default)]
pub enum TaskEditorStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Fetch in flight.
    Loading,
    /// The task to edit.
    Loaded(TaskResponse),
    /// The fetch failed with this error message.
    Error(String),
}

/// Compute-shaped cache holding the server copy of the task being edited.
#[derive(Debug, Clone, Default)]
pub struct TaskEditorCompute {
    pub status: TaskEditorStatus,
    /// The id the current `status` answers.
    pub fetched_id: Option<i64>,
}

impl TaskEditorCompute {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, TaskEditorStatus::Loading)
    }

    pub fn task(&self) -> Option<&TaskResponse> {
        match &self.status {
            TaskEditorStatus::Loaded(task) => Some(task),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            TaskEditorStatus::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Whether the cache answers `id`; the edit page dispatches
    /// [`LoadTaskCommand`] when it does not.
    pub fn is_stale(&self, id: i64) -> bool {
        self.fetched_id != Some(id)
    }
}

impl Compute for TaskEditorCompute {
    fn deps(&self) -> ComputeDeps {
        // Cache updated by a command; no derived dependencies.
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep, _updater: Updater) -> ComputeStage {
        // Intentionally no-op.
        //
        // Dispatch `LoadTaskCommand` to update this compute.
        ComputeStage::Finished
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any>) {
        assign_impl(self, new_self);
    }
}

/// Manual-only command that fetches the task being edited.
///
/// ## Flow
///
/// 1. Reads the target id from `TaskEditorInput.editing_id`
/// 2. Sets the editor cache to `Loading`
/// 3. Makes an authenticated GET to `/tasks/{id}`
/// 4. On success, stores the task; the page copies it into the form fields
///
/// Dispatch explicitly via `ctx.dispatch::<LoadTaskCommand>()`.
#[derive(Default, Debug)]
pub struct LoadTaskCommand;

impl Command for LoadTaskCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let input = deps.get_state_ref::<TaskEditorInput>();
        let client = deps.get_state_ref::<ApiClient>();

        let Some(id) = input.editing_id else {
            info!("LoadTaskCommand: no task id to load");
            updater.set(TaskEditorCompute::default());
            return;
        };

        info!("LoadTaskCommand: loading task {}", id);

        updater.set(TaskEditorCompute {
            status: TaskEditorStatus::Loading,
            fetched_id: Some(id),
        });

        let url = client.url(&format!("/tasks/{id}"));
        client.send(ehttp::Request::get(url), move |result| match result {
            Ok(response) => {
                if response.status == 200 {
                    match serde_json::from_slice::<TaskResponse>(&response.bytes) {
                        Ok(task) => {
                            updater.set(TaskEditorCompute {
                                status: TaskEditorStatus::Loaded(task),
                                fetched_id: Some(id),
                            });
                        }
                        Err(e) => {
                            error!("LoadTaskCommand: Failed to parse TaskResponse: {}", e);
                            updater.set(TaskEditorCompute {
                                status: TaskEditorStatus::Error(
                                    "Failed to parse server response".to_string(),
                                ),
                                fetched_id: Some(id),
                            });
                        }
                    }
                } else if response.status == 404 {
                    let error_msg = extract_error_message(&response.bytes, "Task not found");
                    info!("LoadTaskCommand: {}", error_msg);
                    updater.set(TaskEditorCompute {
                        status: TaskEditorStatus::Error(error_msg),
                        fetched_id: Some(id),
                    });
                } else {
                    let error_msg = extract_error_message(
                        &response.bytes,
                        &format!("Server error (status {})", response.status),
                    );
                    error!("LoadTaskCommand: {}", error_msg);
                    updater.set(TaskEditorCompute {
                        status: TaskEditorStatus::Error(error_msg),
                        fetched_id: Some(id),
                    });
                }
            }
            Err(err) => {
                let error_msg = format!("Network error: {}", err);
                error!("LoadTaskCommand: {}", error_msg);
                updater.set(TaskEditorCompute {
                    status: TaskEditorStatus::Error(error_msg),
                    fetched_id: Some(id),
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_task(id: i64) -> TaskResponse {
        let timestamp = NaiveDate::from_ymd_opt(2026, 1, 15)
            .expect("valid date")
            .and_hms_opt(9, 30, 0)
            .expect("valid time");
        TaskResponse {
            id,
            title: "Write release notes".to_string(),
            description: Some("v2.1".to_string()),
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            user_id: 7,
            user_name: "Test User".to_string(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    #[test]
    fn test_empty_title_is_invalid() {
        let input = TaskEditorInput::default();
        let validation = TaskFormValidation::for_input(&input);
        assert!(!validation.is_valid());
        assert_eq!(validation.title_error.as_deref(), Some("Title is required"));
    }

    #[test]
    fn test_whitespace_title_is_invalid() {
        let input = TaskEditorInput {
            title: "   ".to_string(),
            ..TaskEditorInput::default()
        };
        assert!(!TaskFormValidation::for_input(&input).is_valid());
    }

    #[test]
    fn test_overlong_title_is_invalid() {
        let mut input = TaskEditorInput {
            title: "x".repeat(256),
            ..TaskEditorInput::default()
        };
        let validation = TaskFormValidation::for_input(&input);
        assert_eq!(
            validation.title_error.as_deref(),
            Some("Title must be less than 255 characters")
        );

        input.title = "x".repeat(255);
        assert!(TaskFormValidation::for_input(&input).is_valid());
    }

    #[test]
    fn test_hydrate_copies_server_fields_once() {
        let mut input = TaskEditorInput::default();
        input.reset_for_edit(3);
        assert!(input.needs_hydration());

        input.hydrate_from(&sample_task(3));
        assert!(!input.needs_hydration());
        assert_eq!(input.title, "Write release notes");
        assert_eq!(input.description, "v2.1");
        assert_eq!(input.status, TaskStatus::Todo);
        assert_eq!(input.priority, TaskPriority::High);
    }

    #[test]
    fn test_create_mode_never_needs_hydration() {
        let mut input = TaskEditorInput::default();
        input.reset_for_create();
        assert!(!input.needs_hydration());
    }

    #[test]
    fn test_to_request_trims_and_drops_blank_description() {
        let input = TaskEditorInput {
            title: "  Write release notes  ".to_string(),
            description: "   ".to_string(),
            ..TaskEditorInput::default()
        };

        let request = input.to_request();
        assert_eq!(request.title, "Write release notes");
        assert!(request.description.is_none());
    }

    #[test]
    fn test_editor_cache_staleness_follows_fetched_id() {
        let mut cache = TaskEditorCompute::default();
        assert!(cache.is_stale(3));

        cache.fetched_id = Some(3);
        cache.status = TaskEditorStatus::Loaded(sample_task(3));
        assert!(!cache.is_stale(3));
        assert!(cache.is_stale(4));
    }
}
