//! Admin user edit form and role/status/delete actions.

use std::any::Any;

use log::{error, info};
use taskdeck_states::{
    Command, Compute, ComputeDeps, ComputeStage, Dep, State, Updater, assign_impl,
};

use crate::admin::users::{
    AdminUserResponse, AdminUserUpdateRequest, AdminUsersCompute, UserStatus,
};
use crate::client::{ApiClient, empty_request, json_request};
use crate::error::{ApiError, extract_error_message};
use crate::session::Role;

/// Input state for the admin user edit form.
#[derive(Default, Debug, Clone)]
pub struct AdminUserEditInput {
    /// The user being edited; the edit page sets this from the route.
    pub user_id: Option<i64>,
    /// Role picked in the select.
    pub role: Role,
    /// Status picked in the select.
    pub status: UserStatus,
    /// The id whose server copy has been copied into the fields, so the edit
    /// page hydrates the form exactly once per user.
    pub hydrated_for: Option<i64>,
}

impl AdminUserEditInput {
    /// Point the form at a user; fields fill once the fetch lands.
    pub fn reset_for(&mut self, id: i64) {
        *self = Self {
            user_id: Some(id),
            ..Self::default()
        };
    }

    /// Copy the server copy of the user into the editable fields.
    pub fn hydrate_from(&mut self, user: &AdminUserResponse) {
        self.role = user.role;
        self.status = user.status;
        self.hydrated_for = Some(user.id);
    }

    /// True while the form still shows default fields for its user.
    pub fn needs_hydration(&self) -> bool {
        self.user_id.is_some() && self.user_id != self.hydrated_for
    }

    /// The request payload the form currently describes.
    pub fn to_request(&self) -> AdminUserUpdateRequest {
        AdminUserUpdateRequest {
            role: self.role,
            status: self.status,
        }
    }
}

impl State for AdminUserEditInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Status/result of the single-user fetch.
#[derive(Debug, Clone, Default)]
pub enum AdminUserEditStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Fetch in flight.
    Loading,
    /// The server copy of the user being edited.
    Loaded(AdminUserResponse),
    /// The fetch failed with this error message.
    Error(String),
}

/// Compute-shaped cache for the admin user edit page.
#[derive(Debug, Clone, Default)]
pub struct AdminUserEditCompute {
    pub status: AdminUserEditStatus,
    /// The id the cache currently describes.
    pub fetched_id: Option<i64>,
}

impl AdminUserEditCompute {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, AdminUserEditStatus::Loading)
    }

    pub fn user(&self) -> Option<&AdminUserResponse> {
        match &self.status {
            AdminUserEditStatus::Loaded(user) => Some(user),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            AdminUserEditStatus::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Whether the cache describes a different user than `id`.
    pub fn is_stale(&self, id: i64) -> bool {
        self.fetched_id != Some(id)
    }
}

impl Compute for AdminUserEditCompute {
    fn deps(&self) -> ComputeDeps {
        // Cache updated by a command; no derived dependencies.
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep, _updater: Updater) -> ComputeStage {
        // Intentionally no-op.
        //
        // Dispatch `LoadAdminUserCommand` to update this compute.
        ComputeStage::Finished
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any>) {
        assign_impl(self, new_self);
    }
}

/// Manual-only command that fetches the user being edited.
///
/// ## Flow
///
/// 1. Reads the target id from `AdminUserEditInput.user_id`
/// 2. Sets the edit cache to `Loading`
/// 3. Makes an authenticated GET to `/admin/users/{id}`
/// 4. On success, stores the user; the page copies it into the form fields
///
/// Dispatch explicitly via `ctx.dispatch::<LoadAdminUserCommand>()`.
#[derive(Default, Debug)]
pub struct LoadAdminUserCommand;

impl Command for LoadAdminUserCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let input = deps.get_state_ref::<AdminUserEditInput>();
        let client = deps.get_state_ref::<ApiClient>();

        let Some(id) = input.user_id else {
            info!("LoadAdminUserCommand: no user id to load");
            updater.set(AdminUserEditCompute::default());
            return;
        };

        info!("LoadAdminUserCommand: loading user {}", id);

        updater.set(AdminUserEditCompute {
            status: AdminUserEditStatus::Loading,
            fetched_id: Some(id),
        });

        let url = client.url(&format!("/admin/users/{id}"));
        client.send(ehttp::Request::get(url), move |result| match result {
            Ok(response) => {
                if response.status == 200 {
                    match serde_json::from_slice::<AdminUserResponse>(&response.bytes) {
                        Ok(user) => {
                            updater.set(AdminUserEditCompute {
                                status: AdminUserEditStatus::Loaded(user),
                                fetched_id: Some(id),
                            });
                        }
                        Err(e) => {
                            error!(
                                "LoadAdminUserCommand: Failed to parse AdminUserResponse: {}",
                                e
                            );
                            updater.set(AdminUserEditCompute {
                                status: AdminUserEditStatus::Error(
                                    "Failed to parse server response".to_string(),
                                ),
                                fetched_id: Some(id),
                            });
                        }
                    }
                } else if response.status == 404 {
                    let error_msg = extract_error_message(&response.bytes, "User not found");
                    info!("LoadAdminUserCommand: {}", error_msg);
                    updater.set(AdminUserEditCompute {
                        status: AdminUserEditStatus::Error(error_msg),
                        fetched_id: Some(id),
                    });
                } else {
                    let error_msg = extract_error_message(
                        &response.bytes,
                        &format!("Server error (status {})", response.status),
                    );
                    error!("LoadAdminUserCommand: {}", error_msg);
                    updater.set(AdminUserEditCompute {
                        status: AdminUserEditStatus::Error(error_msg),
                        fetched_id: Some(id),
                    });
                }
            }
            Err(err) => {
                let error_msg = format!("Network error: {}", err);
                error!("LoadAdminUserCommand: {}", error_msg);
                updater.set(AdminUserEditCompute {
                    status: AdminUserEditStatus::Error(error_msg),
                    fetched_id: Some(id),
                });
            }
        });
    }
}

/// Strongly-typed admin action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminActionKind {
    Update,
    Delete,
}

/// Strongly-typed admin action state.
#[derive(Debug, Clone, Default)]
pub enum AdminActionState {
    /// No active action.
    #[default]
    Idle,

    /// An action is currently running.
    InFlight { kind: AdminActionKind },

    /// An action succeeded.
    Success { kind: AdminActionKind },

    /// An action failed.
    Error {
        kind: AdminActionKind,
        message: String,
    },
}

/// Compute-shaped cache for admin user actions.
#[derive(Debug, Clone, Default)]
pub struct AdminActionCompute {
    pub state: AdminActionState,
}

impl AdminActionCompute {
    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, AdminActionState::InFlight { .. })
    }

    /// The kind of the action that just succeeded, if any.
    pub fn succeeded(&self) -> Option<AdminActionKind> {
        match self.state {
            AdminActionState::Success { kind } => Some(kind),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            AdminActionState::Error { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}

impl Compute for AdminActionCompute {
    fn deps(&self) -> ComputeDeps {
        // Updated explicitly by commands; no derived dependencies.
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep, _updater: Updater) -> ComputeStage {
        // Intentionally no-op.
        ComputeStage::Finished
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any>) {
        assign_impl(self, new_self);
    }
}

/// Input state for admin user actions.
///
/// The users page sets `pending_delete` when the admin confirms the delete
/// dialog, then dispatches [`DeleteAdminUserCommand`].
#[derive(Default, Debug, Clone)]
pub struct AdminActionInput {
    /// User to delete on the next `DeleteAdminUserCommand` dispatch.
    pub pending_delete: Option<i64>,
}

impl State for AdminActionInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn failure(kind: AdminActionKind, error: &ApiError) -> AdminActionCompute {
    AdminActionCompute {
        state: AdminActionState::Error {
            kind,
            message: error.to_string(),
        },
    }
}

/// Manual-only command that saves the role and status picked in the form.
///
/// ## Flow
///
/// 1. Builds the payload from `AdminUserEditInput`
/// 2. PUTs to `/admin/users/{id}` through the authenticated pipeline
/// 3. On success, resets the directory and edit caches and reports `Success`
///
/// Dispatch explicitly via `ctx.dispatch::<UpdateAdminUserCommand>()`.
#[derive(Default, Debug)]
pub struct UpdateAdminUserCommand;

impl Command for UpdateAdminUserCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let input = deps.get_state_ref::<AdminUserEditInput>();
        let client = deps.get_state_ref::<ApiClient>();

        let Some(id) = input.user_id else {
            info!("UpdateAdminUserCommand: no user selected");
            updater.set(AdminActionCompute {
                state: AdminActionState::Error {
                    kind: AdminActionKind::Update,
                    message: "No user selected".to_string(),
                },
            });
            return;
        };
        let payload = input.to_request();

        info!(
            "UpdateAdminUserCommand: updating user {} to {:?}/{:?}",
            id, payload.role, payload.status
        );

        updater.set(AdminActionCompute {
            state: AdminActionState::InFlight {
                kind: AdminActionKind::Update,
            },
        });

        let request = match json_request("PUT", client.url(&format!("/admin/users/{id}")), &payload)
        {
            Ok(request) => request,
            Err(e) => {
                error!(
                    "UpdateAdminUserCommand: Failed to serialize AdminUserUpdateRequest: {}",
                    e
                );
                updater.set(AdminActionCompute {
                    state: AdminActionState::Error {
                        kind: AdminActionKind::Update,
                        message: format!("Internal error: {e}"),
                    },
                });
                return;
            }
        };

        client.send(request, move |result| match result {
            Ok(response) => {
                if response.status == 200 {
                    info!("UpdateAdminUserCommand: user {} updated", id);
                    updater.set(AdminUsersCompute::reset());
                    updater.set(AdminUserEditCompute::default());
                    updater.set(AdminActionCompute {
                        state: AdminActionState::Success {
                            kind: AdminActionKind::Update,
                        },
                    });
                } else {
                    let error = ApiError::from_response(&response);
                    info!("UpdateAdminUserCommand: update rejected: {}", error);
                    updater.set(failure(AdminActionKind::Update, &error));
                }
            }
            Err(err) => {
                let error = ApiError::Network(err);
                error!("UpdateAdminUserCommand: {}", error);
                updater.set(failure(AdminActionKind::Update, &error));
            }
        });
    }
}

/// Manual-only command that deletes the user in `AdminActionInput.pending_delete`.
///
/// ## Flow
///
/// 1. Reads the target id from `AdminActionInput`
/// 2. Makes an authenticated DELETE to `/admin/users/{id}` (204 on success)
/// 3. On success, resets the directory cache and reports `Success`
///
/// Dispatch explicitly via `ctx.dispatch::<DeleteAdminUserCommand>()`.
#[derive(Default, Debug)]
pub struct DeleteAdminUserCommand;

impl Command for DeleteAdminUserCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let input = deps.get_state_ref::<AdminActionInput>();
        let client = deps.get_state_ref::<ApiClient>();

        let Some(id) = input.pending_delete else {
            info!("DeleteAdminUserCommand: no user selected");
            updater.set(AdminActionCompute {
                state: AdminActionState::Error {
                    kind: AdminActionKind::Delete,
                    message: "No user selected".to_string(),
                },
            });
            return;
        };

        info!("DeleteAdminUserCommand: deleting user {}", id);

        updater.set(AdminActionCompute {
            state: AdminActionState::InFlight {
                kind: AdminActionKind::Delete,
            },
        });

        let request = empty_request("DELETE", client.url(&format!("/admin/users/{id}")));
        client.send(request, move |result| match result {
            Ok(response) => {
                if response.status == 204 {
                    info!("DeleteAdminUserCommand: user {} deleted", id);
                    updater.set(AdminUsersCompute::reset());
                    updater.set(AdminActionCompute {
                        state: AdminActionState::Success {
                            kind: AdminActionKind::Delete,
                        },
                    });
                } else {
                    let error = ApiError::from_response(&response);
                    info!("DeleteAdminUserCommand: delete rejected: {}", error);
                    updater.set(failure(AdminActionKind::Delete, &error));
                }
            }
            Err(err) => {
                let error = ApiError::Network(err);
                error!("DeleteAdminUserCommand: {}", error);
                updater.set(failure(AdminActionKind::Delete, &error));
            }
        });
    }
}

/// Manual-only command that clears the admin action result.
///
/// Pages dispatch this after reacting to `Success` so the outcome is not
/// replayed on the next frame.
#[derive(Default, Debug)]
pub struct ResetAdminActionCommand;

impl Command for ResetAdminActionCommand {
    fn run(&self, _deps: Dep, updater: Updater) {
        updater.set(AdminActionCompute::default());
    }
}
