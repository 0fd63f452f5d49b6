//! Profile page state: viewing and updating the signed-in user.
//!
//! `GET /users/me` fills [`ProfileCompute`]; [`UpdateProfileCommand`] PUTs
//! name and password changes back. A successful update also refreshes the
//! user snapshot stored in the session so the rest of the UI picks up the new
//! name without re-authenticating.

use std::any::Any;

use chrono::NaiveDateTime;
use log::{error, info};
use serde::{Deserialize, Serialize};
use taskdeck_states::{
    Command, Compute, ComputeDeps, ComputeStage, Dep, State, Updater, assign_impl,
};

use crate::client::{ApiClient, json_request};
use crate::error::{ApiError, FieldError};
use crate::session::{AuthUser, Role, Session};

/// The signed-in user as `/users/me` reports it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserResponse {
    /// The session snapshot equivalent of this response.
    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// Update payload for `/users/me`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

/// Input state for the profile form.
#[derive(Default, Debug, Clone)]
pub struct ProfileInput {
    /// Display name field, prefilled from the loaded profile.
    pub name: String,
    /// Current password, required when changing the password.
    pub current_password: String,
    /// New password; leave empty to keep the current one.
    pub new_password: String,
    /// Whether `name` has been prefilled from the loaded profile.
    pub hydrated: bool,
}

impl ProfileInput {
    /// Prefill the editable name from the server copy, once.
    pub fn hydrate_from(&mut self, user: &UserResponse) {
        self.name = user.name.clone();
        self.hydrated = true;
    }

    /// Forget form contents, next page visit re-hydrates.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl State for ProfileInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Status/result of the profile fetch.
#[derive(Debug, Clone, Default)]
pub enum ProfileStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Fetch in flight.
    Loading,
    /// The signed-in user's profile.
    Loaded(UserResponse),
    /// The fetch failed with this error message.
    Error(String),
}

/// Compute-shaped cache for the profile page.
#[derive(Debug, Clone, Default)]
pub struct ProfileCompute {
    pub status: ProfileStatus,
}

impl ProfileCompute {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, ProfileStatus::Loading)
    }

    pub fn user(&self) -> Option<&UserResponse> {
        match &self.status {
            ProfileStatus::Loaded(user) => Some(user),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            ProfileStatus::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Whether the page should dispatch [`LoadProfileCommand`].
    pub fn needs_fetch(&self) -> bool {
        matches!(self.status, ProfileStatus::Idle)
    }
}

impl Compute for ProfileCompute {
    fn deps(&self) -> ComputeDeps {
        // Cache updated by a command; no derived dependencies.
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep, _updater: Updater) -> ComputeStage {
        // Intentionally no-op.
        //
        // Dispatch `LoadProfileCommand` to update this compute.
        ComputeStage::Finished
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any>) {
        assign_impl(self, new_self);
    }
}

/// Status of the profile update action.
#[derive(Debug, Clone, Default)]
pub enum ProfileActionState {
    /// No active action.
    #[default]
    Idle,
    /// Update in flight.
    InFlight,
    /// The update succeeded.
    Success,
    /// The update failed.
    Error {
        message: String,
        field_errors: Vec<FieldError>,
    },
}

/// Compute-shaped cache for the profile update action.
#[derive(Debug, Clone, Default)]
pub struct ProfileActionCompute {
    pub state: ProfileActionState,
}

impl ProfileActionCompute {
    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, ProfileActionState::InFlight)
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.state, ProfileActionState::Success)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ProfileActionState::Error { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Server-side validation message for one form field, if present.
    pub fn field_message(&self, field: &str) -> Option<&str> {
        match &self.state {
            ProfileActionState::Error { field_errors, .. } => field_errors
                .iter()
                .find(|e| e.field == field)
                .map(|e| e.message.as_str()),
            _ => None,
        }
    }
}

impl Compute for ProfileActionCompute {
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

/// Manual-only command that fetches the signed-in user's profile.
///
/// Dispatch explicitly via `ctx.dispatch::<LoadProfileCommand>()`.
#[derive(Default, Debug)]
pub struct LoadProfileCommand;

impl Command for LoadProfileCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let client = deps.get_state_ref::<ApiClient>();

        info!("LoadProfileCommand: fetching profile");

        updater.set(ProfileCompute {
            status: ProfileStatus::Loading,
        });

        let url = client.url("/users/me");
        client.send(ehttp::Request::get(url), move |result| match result {
            Ok(response) => {
                if response.status == 200 {
                    match serde_json::from_slice::<UserResponse>(&response.bytes) {
                        Ok(user) => {
                            updater.set(ProfileCompute {
                                status: ProfileStatus::Loaded(user),
                            });
                        }
                        Err(e) => {
                            error!("LoadProfileCommand: Failed to parse UserResponse: {}", e);
                            updater.set(ProfileCompute {
                                status: ProfileStatus::Error(
                                    "Failed to parse server response".to_string(),
                                ),
                            });
                        }
                    }
                } else {
                    let error = ApiError::from_response(&response);
                    error!("LoadProfileCommand: {}", error);
                    updater.set(ProfileCompute {
                        status: ProfileStatus::Error(error.to_string()),
                    });
                }
            }
            Err(err) => {
                let error_msg = format!("Network error: {}", err);
                error!("LoadProfileCommand: {}", error_msg);
                updater.set(ProfileCompute {
                    status: ProfileStatus::Error(error_msg),
                });
            }
        });
    }
}

/// Manual-only command that saves profile changes.
///
/// ## Flow
///
/// 1. Builds the payload from `ProfileInput`; empty fields are not sent
/// 2. A new password requires the current one and at least 6 characters
/// 3. PUTs to `/users/me` through the authenticated pipeline
/// 4. On success, refreshes the profile cache and the session's user snapshot
///
/// Dispatch explicitly via `ctx.dispatch::<UpdateProfileCommand>()`.
#[derive(Default, Debug)]
pub struct UpdateProfileCommand;

impl Command for UpdateProfileCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let input = deps.get_state_ref::<ProfileInput>();
        let client = deps.get_state_ref::<ApiClient>();

        let name = input.name.trim().to_string();
        let new_password = input.new_password.clone();
        let current_password = input.current_password.clone();

        let mut payload = UpdateUserRequest::default();
        if !name.is_empty() {
            if name.chars().count() < 2 || name.chars().count() > 100 {
                info!("UpdateProfileCommand: name length out of range");
                updater.set(ProfileActionCompute {
                    state: ProfileActionState::Error {
                        message: "Name must be between 2 and 100 characters".to_string(),
                        field_errors: vec![FieldError {
                            field: "name".to_string(),
                            message: "Name must be between 2 and 100 characters".to_string(),
                        }],
                    },
                });
                return;
            }
            payload.name = Some(name);
        }
        if !new_password.is_empty() {
            if current_password.is_empty() {
                info!("UpdateProfileCommand: current password missing");
                updater.set(ProfileActionCompute {
                    state: ProfileActionState::Error {
                        message: "Current password is required".to_string(),
                        field_errors: vec![FieldError {
                            field: "currentPassword".to_string(),
                            message: "Current password is required".to_string(),
                        }],
                    },
                });
                return;
            }
            if new_password.chars().count() < 6 {
                info!("UpdateProfileCommand: new password too short");
                updater.set(ProfileActionCompute {
                    state: ProfileActionState::Error {
                        message: "New password must be at least 6 characters".to_string(),
                        field_errors: vec![FieldError {
                            field: "newPassword".to_string(),
                            message: "New password must be at least 6 characters".to_string(),
                        }],
                    },
                });
                return;
            }
            payload.current_password = Some(current_password);
            payload.new_password = Some(new_password);
        }

        if payload.name.is_none() && payload.new_password.is_none() {
            info!("UpdateProfileCommand: nothing to update");
            updater.set(ProfileActionCompute {
                state: ProfileActionState::Error {
                    message: "Nothing to update".to_string(),
                    field_errors: Vec::new(),
                },
            });
            return;
        }

        info!("UpdateProfileCommand: saving profile changes");

        updater.set(ProfileActionCompute {
            state: ProfileActionState::InFlight,
        });

        let request = match json_request("PUT", client.url("/users/me"), &payload) {
            Ok(request) => request,
            Err(e) => {
                error!(
                    "UpdateProfileCommand: Failed to serialize UpdateUserRequest: {}",
                    e
                );
                updater.set(ProfileActionCompute {
                    state: ProfileActionState::Error {
                        message: format!("Internal error: {e}"),
                        field_errors: Vec::new(),
                    },
                });
                return;
            }
        };

        let store = client.session_store();
        client.send(request, move |result| match result {
            Ok(response) => {
                if response.status == 200 {
                    match serde_json::from_slice::<UserResponse>(&response.bytes) {
                        Ok(user) => {
                            info!("UpdateProfileCommand: profile saved");
                            // The nav bar shows the session snapshot, keep it in step.
                            if let Some(session) = store.get() {
                                store.set(Session {
                                    user: user.to_auth_user(),
                                    ..session
                                });
                            }
                            updater.set(crate::auth::AuthCompute::signed_in(user.to_auth_user()));
                            updater.set(ProfileCompute {
                                status: ProfileStatus::Loaded(user),
                            });
                            updater.set(ProfileActionCompute {
                                state: ProfileActionState::Success,
                            });
                        }
                        Err(e) => {
                            error!("UpdateProfileCommand: Failed to parse UserResponse: {}", e);
                            updater.set(ProfileActionCompute {
                                state: ProfileActionState::Error {
                                    message: "Failed to parse server response".to_string(),
                                    field_errors: Vec::new(),
                                },
                            });
                        }
                    }
                } else {
                    let error = ApiError::from_response(&response);
                    info!("UpdateProfileCommand: update rejected: {}", error);
                    updater.set(ProfileActionCompute {
                        state: ProfileActionState::Error {
                            message: error.to_string(),
                            field_errors: error.field_errors().to_vec(),
                        },
                    });
                }
            }
            Err(err) => {
                let error_msg = format!("Network error: {}", err);
                error!("UpdateProfileCommand: {}", error_msg);
                updater.set(ProfileActionCompute {
                    state: ProfileActionState::Error {
                        message: error_msg,
                        field_errors: Vec::new(),
                    },
                });
            }
        });
    }
}

/// Manual-only command that clears the profile action result.
///
/// Dispatch explicitly via `ctx.dispatch::<ResetProfileActionCommand>()`.
#[derive(Default, Debug)]
pub struct ResetProfileActionCommand;

impl Command for ResetProfileActionCommand {
    fn run(&self, _deps: Dep, updater: Updater) {
        updater.set(ProfileActionCompute::default());
    }
}
