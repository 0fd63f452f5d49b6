//! Task save/delete actions compute + commands.
//!
//! Canonical action pattern:
//! - UI dispatches a command (manual-only; allowed to do network IO)
//! - The command updates [`TaskActionCompute`] via `Updater::set()`
//! - UI reads via `ctx.cached::<TaskActionCompute>()`
//!
//! Actions covered: create, update and delete a task. Successful mutations
//! also reset the list and editor caches so the next frame re-fetches.

use std::any::Any;

use log::{error, info};
use taskdeck_states::{
    Command, Compute, ComputeDeps, ComputeStage, Dep, State, Updater, assign_impl,
};

use crate::client::{ApiClient, json_request};
use crate::error::{ApiError, FieldError};
use crate::tasks::editor::{TaskEditorCompute, TaskEditorInput};
use crate::tasks::list_compute::TaskListCompute;

/// Strongly-typed action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskActionKind {
    Create,
    Update,
    Delete,
}

/// Strongly-typed action state.
#[derive(Debug, Clone, Default)]
pub enum TaskActionState {
    /// No active action.
    #[default]
    Idle,

    /// An action is currently running.
    InFlight { kind: TaskActionKind },

    /// An action succeeded.
    Success { kind: TaskActionKind },

    /// An action failed. Field errors are kept so the form can render them
    /// next to their inputs.
    Error {
        kind: TaskActionKind,
        message: String,
        field_errors: Vec<FieldError>,
    },
}

/// Compute-shaped cache for task actions.
#[derive(Debug, Clone, Default)]
pub struct TaskActionCompute {
    pub state: TaskActionState,
}

impl TaskActionCompute {
    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, TaskActionState::InFlight { .. })
    }

    /// The kind of the action that just succeeded, if any.
    pub fn succeeded(&self) -> Option<TaskActionKind> {
        match self.state {
            TaskActionState::Success { kind } => Some(kind),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            TaskActionState::Error { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Server-side validation message for one form field, if present.
    pub fn field_message(&self, field: &str) -> Option<&str> {
        match &self.state {
            TaskActionState::Error { field_errors, .. } => field_errors
                .iter()
                .find(|e| e.field == field)
                .map(|e| e.message.as_str()),
            _ => None,
        }
    }
}

impl Compute for TaskActionCompute {
    fn deps(&self) -> ComputeDeps {
        // Updated explicitly by commands; no derived dependencies.
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep, _updater: Updater) -> ComputeStage {
        // Intentionally no-op.
        //
        // Dispatch one of the task action commands to update this compute.
        ComputeStage::Finished
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any>) {
        assign_impl(self, new_self);
    }
}

/// Input state for task actions.
///
/// The tasks page sets `pending_delete` when the user confirms the delete
/// dialog, then dispatches [`DeleteTaskCommand`].
#[derive(Default, Debug, Clone)]
pub struct TaskActionInput {
    /// Task to delete on the next `DeleteTaskCommand` dispatch.
    pub pending_delete: Option<i64>,
}

impl State for TaskActionInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn failure(kind: TaskActionKind, error: &ApiError) -> TaskActionCompute {
    TaskActionCompute {
        state: TaskActionState::Error {
            kind,
            message: error.to_string(),
            field_errors: error.field_errors().to_vec(),
        },
    }
}

/// Manual-only command that creates or updates a task from the form fields.
///
/// ## Flow
///
/// 1. Builds the payload from `TaskEditorInput` (create when `editing_id` is
///    `None`, update otherwise)
/// 2. Rejects an empty title without calling the server
/// 3. POSTs to `/tasks` or PUTs to `/tasks/{id}` through the authenticated pipeline
/// 4. On success, resets the list and editor caches and reports `Success`
/// 5. On failure, reports `Error` with the server's message and field errors
///
/// Dispatch explicitly via `ctx.dispatch::<SaveTaskCommand>()`.
#[derive(Default, Debug)]
pub struct SaveTaskCommand;

impl Command for SaveTaskCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let input = deps.get_state_ref::<TaskEditorInput>();
        let client = deps.get_state_ref::<ApiClient>();

        let payload = input.to_request();
        let kind = if input.editing_id.is_some() {
            TaskActionKind::Update
        } else {
            TaskActionKind::Create
        };

        if payload.title.is_empty() {
            info!("SaveTaskCommand: title is empty");
            updater.set(TaskActionCompute {
                state: TaskActionState::Error {
                    kind,
                    message: "Title is required".to_string(),
                    field_errors: vec![FieldError {
                        field: "title".to_string(),
                        message: "Title is required".to_string(),
                    }],
                },
            });
            return;
        }

        info!(
            "SaveTaskCommand: {} '{}'",
            match kind {
                TaskActionKind::Update => "updating",
                _ => "creating",
            },
            payload.title
        );

        updater.set(TaskActionCompute {
            state: TaskActionState::InFlight { kind },
        });

        let request = match input.editing_id {
            Some(id) => json_request("PUT", client.url(&format!("/tasks/{id}")), &payload),
            None => json_request("POST", client.url("/tasks"), &payload),
        };
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                error!("SaveTaskCommand: Failed to serialize TaskRequest: {}", e);
                updater.set(TaskActionCompute {
                    state: TaskActionState::Error {
                        kind,
                        message: format!("Internal error: {e}"),
                        field_errors: Vec::new(),
                    },
                });
                return;
            }
        };

        client.send(request, move |result| match result {
            Ok(response) => {
                // Create answers 201, update answers 200
                if response.ok {
                    info!("SaveTaskCommand: task saved");
                    updater.set(TaskListCompute::reset());
                    updater.set(TaskEditorCompute::default());
                    updater.set(TaskActionCompute {
                        state: TaskActionState::Success { kind },
                    });
                } else {
                    let error = ApiError::from_response(&response);
                    info!("SaveTaskCommand: save rejected: {}", error);
                    updater.set(failure(kind, &error));
                }
            }
            Err(err) => {
                let error = ApiError::Network(err);
                error!("SaveTaskCommand: {}", error);
                updater.set(failure(kind, &error));
            }
        });
    }
}

/// Manual-only command that deletes the task in `TaskActionInput.pending_delete`.
///
/// ## Flow
///
/// 1. Reads the target id from `TaskActionInput`
/// 2. Makes an authenticated DELETE to `/tasks/{id}` (204 on success)
/// 3. On success, resets the list and editor caches and reports `Success`
///
/// Dispatch explicitly via `ctx.dispatch::<DeleteTaskCommand>()`.
#[derive(Default, Debug)]
pub struct DeleteTaskCommand;

impl Command for DeleteTaskCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let input = deps.get_state_ref::<TaskActionInput>();
        let client = deps.get_state_ref::<ApiClient>();

        let Some(id) = input.pending_delete else {
            info!("DeleteTaskCommand: no task selected");
            updater.set(TaskActionCompute {
                state: TaskActionState::Error {
                    kind: TaskActionKind::Delete,
                    message: "No task selected".to_string(),
                    field_errors: Vec::new(),
                },
            });
            return;
        };

        info!("DeleteTaskCommand: deleting task {}", id);

        updater.set(TaskActionCompute {
            state: TaskActionState::InFlight {
                kind: TaskActionKind::Delete,
            },
        });

        let request = crate::client::empty_request("DELETE", client.url(&format!("/tasks/{id}")));
        client.send(request, move |result| match result {
            Ok(response) => {
                if response.status == 204 {
                    info!("DeleteTaskCommand: task {} deleted", id);
                    updater.set(TaskListCompute::reset());
                    updater.set(TaskEditorCompute::default());
                    updater.set(TaskActionCompute {
                        state: TaskActionState::Success {
                            kind: TaskActionKind::Delete,
                        },
                    });
                } else {
                    let error = ApiError::from_response(&response);
                    info!("DeleteTaskCommand: delete rejected: {}", error);
                    updater.set(failure(TaskActionKind::Delete, &error));
                }
            }
            Err(err) => {
                let error = ApiError::Network(err);
                error!("DeleteTaskCommand: {}", error);
                updater.set(failure(TaskActionKind::Delete, &error));
            }
        });
    }
}

/// Manual-only command that clears the task action result.
///
/// Pages dispatch this after reacting to `Success` so the outcome is not
/// replayed on the next frame.
#[derive(Default, Debug)]
pub struct ResetTaskActionCommand;

impl Command for ResetTaskActionCommand {
    fn run(&self, _deps: Dep, updater: Updater) {
        updater.set(TaskActionCompute::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_compute_default_is_idle() {
        let action = TaskActionCompute::default();
        assert!(!action.is_in_flight());
        assert!(action.succeeded().is_none());
        assert!(action.error_message().is_none());
    }

    #[test]
    fn test_in_flight_reports_busy() {
        let action = TaskActionCompute {
            state: TaskActionState::InFlight {
                kind: TaskActionKind::Create,
            },
        };
        assert!(action.is_in_flight());
        assert!(action.succeeded().is_none());
    }

    #[test]
    fn test_success_exposes_kind() {
        let action = TaskActionCompute {
            state: TaskActionState::Success {
                kind: TaskActionKind::Delete,
            },
        };
        assert_eq!(action.succeeded(), Some(TaskActionKind::Delete));
    }

    #[test]
    fn test_field_message_finds_matching_field() {
        let action = TaskActionCompute {
            state: TaskActionState::Error {
                kind: TaskActionKind::Create,
                message: "Validation failed".to_string(),
                field_errors: vec![FieldError {
                    field: "title".to_string(),
                    message: "Title is required".to_string(),
                }],
            },
        };
        assert_eq!(action.field_message("title"), Some("Title is required"));
        assert_eq!(action.field_message("description"), None);
        assert_eq!(action.error_message(), Some("Validation failed"));
    }
}
