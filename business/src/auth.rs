//! Authentication flow and session lifecycle.
//!
//! This module provides the credential form state and the sign-in, sign-up
//! and sign-out flows. It tracks:
//! - Email, password and display name input
//! - Which form is active (sign in or sign up)
//! - Authentication status (signed in or not)
//!
//! The backend hands out a short-lived access token and a single-use refresh
//! token on success. Both are kept in the [`SessionStore`](crate::session::SessionStore)
//! together with a snapshot of the user, so the UI can restore the session on
//! the next launch without a round trip.

use std::any::Any;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use taskdeck_states::{
    Command, Compute, ComputeDeps, ComputeStage, Dep, State, Updater, assign_impl,
};

use crate::client::ApiClient;
use crate::error::extract_error_message;
use crate::session::{AuthUser, Session};

/// Request payload for account creation.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    /// Email address, also the login identifier.
    pub email: String,
    /// Plain password; hashed server-side.
    pub password: String,
    /// Display name shown across the app.
    pub name: String,
}

/// Request payload for signing in.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Email address of the account.
    pub email: String,
    /// Plain password.
    pub password: String,
}

/// Request payload for token renewal and sign-out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The refresh token currently stored for this session.
    pub refresh_token: String,
}

/// Response from the signup, login and refresh endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Short-lived bearer token attached to every authenticated request.
    pub access_token: String,
    /// Single-use token exchanged for a fresh pair when the access token expires.
    pub refresh_token: String,
    /// Always "Bearer".
    pub token_type: String,
    /// Access token lifetime in milliseconds.
    pub expires_in: i64,
    /// Snapshot of the signed-in user.
    pub user: AuthUser,
}

/// Which of the two credential forms is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialsMode {
    /// Existing account, email and password only.
    #[default]
    SignIn,
    /// New account, additionally asks for a display name.
    SignUp,
}

/// Input state for the login page.
///
/// Contains the editable credential fields for both forms.
#[derive(Default, Debug, Clone)]
pub struct CredentialsInput {
    /// Active form.
    pub mode: CredentialsMode,
    /// Email entered by the user.
    pub email: String,
    /// Password entered by the user.
    pub password: String,
    /// Display name entered by the user (sign-up only).
    pub name: String,
}

impl State for CredentialsInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Result/status of authentication.
#[derive(Debug, Clone, Default)]
pub enum AuthStatus {
    /// No user signed in.
    #[default]
    Anonymous,
    /// Sign-in or sign-up call in flight.
    Authenticating,
    /// Successfully authenticated.
    Authenticated {
        /// The signed-in user.
        user: AuthUser,
    },
    /// Authentication failed with an error.
    Failed(String),
}

impl AuthStatus {
    /// Check if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Self::Authenticated { user } => Some(user),
            _ => None,
        }
    }

    /// The failure message, if the last attempt failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Compute-shaped cache for authentication status.
///
/// This is intentionally a `Compute` with a no-op `compute()` so it can be
/// read through the normal caching path and updated via `Updater::set(...)`
/// from a command.
#[derive(Default, Debug)]
pub struct AuthCompute {
    pub status: AuthStatus,
}

impl AuthCompute {
    /// Cache primed from a session restored out of durable storage.
    pub fn signed_in(user: AuthUser) -> Self {
        Self {
            status: AuthStatus::Authenticated { user },
        }
    }

    /// Check if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.status.is_authenticated()
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&AuthUser> {
        self.status.user()
    }

    /// Whether the signed-in user may open the admin pages.
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|user| user.role.is_admin())
    }
}

impl Compute for AuthCompute {
    fn deps(&self) -> ComputeDeps {
        // Cache updated by commands; no derived dependencies.
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep, _updater: Updater) -> ComputeStage {
        // Intentionally no-op.
        //
        // Auth updates are explicit user actions handled by the auth commands.
        ComputeStage::Finished
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any>) {
        assign_impl(self, new_self);
    }
}

/// Manual-only command that signs an existing user in.
///
/// ## Flow
///
/// 1. Validates that email and password are non-empty
/// 2. Sets status to `Authenticating`
/// 3. Makes HTTP POST to `/auth/login` with email and password
/// 4. On success, stores the session (tokens + user) and sets status to `Authenticated`
/// 5. On failure, sets status to `Failed` with error message
///
/// Dispatch explicitly via `ctx.dispatch::<SignInCommand>()`.
#[derive(Default, Debug)]
pub struct SignInCommand;

impl Command for SignInCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let input = deps.get_state_ref::<CredentialsInput>();
        let client = deps.get_state_ref::<ApiClient>();

        let email = input.email.trim().to_string();
        let password = input.password.clone();

        if email.is_empty() {
            info!("SignInCommand: email is empty");
            updater.set(AuthCompute {
                status: AuthStatus::Failed("Email is required".to_string()),
            });
            return;
        }

        if password.is_empty() {
            info!("SignInCommand: password is empty");
            updater.set(AuthCompute {
                status: AuthStatus::Failed("Password is required".to_string()),
            });
            return;
        }

        info!("SignInCommand: signing in '{}'", email);

        // Set status to authenticating while we wait for the backend response
        updater.set(AuthCompute {
            status: AuthStatus::Authenticating,
        });

        let url = client.url("/auth/login");
        let body = match serde_json::to_vec(&LoginRequest { email, password }) {
            Ok(body) => body,
            Err(e) => {
                error!("SignInCommand: Failed to serialize LoginRequest: {}", e);
                updater.set(AuthCompute {
                    status: AuthStatus::Failed(format!("Internal error: {e}")),
                });
                return;
            }
        };

        let mut request = ehttp::Request::post(&url, body);
        request.headers.insert("Content-Type", "application/json");

        // Login is unauthenticated by definition, so it skips the renewal pipeline
        let store = client.session_store();
        client.send_raw(request, move |result| match result {
            Ok(response) => {
                if response.status == 200 {
                    match serde_json::from_slice::<AuthResponse>(&response.bytes) {
                        Ok(auth) => {
                            info!("SignInCommand: signed in as '{}'", auth.user.email);
                            store.set(Session {
                                access_token: auth.access_token,
                                refresh_token: auth.refresh_token,
                                user: auth.user.clone(),
                            });
                            updater.set(AuthCompute {
                                status: AuthStatus::Authenticated { user: auth.user },
                            });
                        }
                        Err(e) => {
                            error!("SignInCommand: Failed to parse AuthResponse: {}", e);
                            updater.set(AuthCompute {
                                status: AuthStatus::Failed(
                                    "Failed to parse server response".to_string(),
                                ),
                            });
                        }
                    }
                } else if response.status == 400 {
                    let error_msg = extract_error_message(&response.bytes, "Invalid request");
                    info!("SignInCommand: Bad request: {}", error_msg);
                    updater.set(AuthCompute {
                        status: AuthStatus::Failed(error_msg),
                    });
                } else if response.status == 401 {
                    let error_msg =
                        extract_error_message(&response.bytes, "Invalid email or password");
                    info!("SignInCommand: Authentication failed: {}", error_msg);
                    updater.set(AuthCompute {
                        status: AuthStatus::Failed(error_msg),
                    });
                } else {
                    let error_msg = format!("Server error (status {})", response.status);
                    error!("SignInCommand: {}", error_msg);
                    updater.set(AuthCompute {
                        status: AuthStatus::Failed(error_msg),
                    });
                }
            }
            Err(err) => {
                let error_msg = format!("Network error: {}", err);
                error!("SignInCommand: {}", error_msg);
                updater.set(AuthCompute {
                    status: AuthStatus::Failed(error_msg),
                });
            }
        });
    }
}

/// Manual-only command that creates an account and signs it in.
///
/// ## Flow
///
/// 1. Validates email, password and name locally (mirrors the server rules)
/// 2. Sets status to `Authenticating`
/// 3. Makes HTTP POST to `/auth/signup` with email, password and name
/// 4. On success, stores the session and sets status to `Authenticated`
/// 5. On failure, sets status to `Failed` with error message
///
/// Dispatch explicitly via `ctx.dispatch::<SignUpCommand>()`.
#[derive(Default, Debug)]
pub struct SignUpCommand;

impl Command for SignUpCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let input = deps.get_state_ref::<CredentialsInput>();
        let client = deps.get_state_ref::<ApiClient>();

        let email = input.email.trim().to_string();
        let password = input.password.clone();
        let name = input.name.trim().to_string();

        if email.is_empty() {
            info!("SignUpCommand: email is empty");
            updater.set(AuthCompute {
                status: AuthStatus::Failed("Email is required".to_string()),
            });
            return;
        }

        if name.is_empty() {
            info!("SignUpCommand: name is empty");
            updater.set(AuthCompute {
                status: AuthStatus::Failed("Name is required".to_string()),
            });
            return;
        }

        if name.chars().count() < 2 || name.chars().count() > 100 {
            info!("SignUpCommand: name length out of range");
            updater.set(AuthCompute {
                status: AuthStatus::Failed(
                    "Name must be between 2 and 100 characters".to_string(),
                ),
            });
            return;
        }

        if password.chars().count() < 6 {
            info!("SignUpCommand: password too short");
            updater.set(AuthCompute {
                status: AuthStatus::Failed(
                    "Password must be at least 6 characters".to_string(),
                ),
            });
            return;
        }

        info!("SignUpCommand: creating account '{}'", email);

        // Set status to authenticating while we wait for the backend response
        updater.set(AuthCompute {
            status: AuthStatus::Authenticating,
        });

        let url = client.url("/auth/signup");
        let body = match serde_json::to_vec(&SignupRequest {
            email,
            password,
            name,
        }) {
            Ok(body) => body,
            Err(e) => {
                error!("SignUpCommand: Failed to serialize SignupRequest: {}", e);
                updater.set(AuthCompute {
                    status: AuthStatus::Failed(format!("Internal error: {e}")),
                });
                return;
            }
        };

        let mut request = ehttp::Request::post(&url, body);
        request.headers.insert("Content-Type", "application/json");

        let store = client.session_store();
        client.send_raw(request, move |result| match result {
            Ok(response) => {
                // The server answers 201 on creation; accept any 2xx
                if response.ok {
                    match serde_json::from_slice::<AuthResponse>(&response.bytes) {
                        Ok(auth) => {
                            info!("SignUpCommand: account created for '{}'", auth.user.email);
                            store.set(Session {
                                access_token: auth.access_token,
                                refresh_token: auth.refresh_token,
                                user: auth.user.clone(),
                            });
                            updater.set(AuthCompute {
                                status: AuthStatus::Authenticated { user: auth.user },
                            });
                        }
                        Err(e) => {
                            error!("SignUpCommand: Failed to parse AuthResponse: {}", e);
                            updater.set(AuthCompute {
                                status: AuthStatus::Failed(
                                    "Failed to parse server response".to_string(),
                                ),
                            });
                        }
                    }
                } else if response.status == 400 {
                    let error_msg =
                        extract_error_message(&response.bytes, "Invalid signup details");
                    info!("SignUpCommand: Bad request: {}", error_msg);
                    updater.set(AuthCompute {
                        status: AuthStatus::Failed(error_msg),
                    });
                } else {
                    let error_msg = format!("Server error (status {})", response.status);
                    error!("SignUpCommand: {}", error_msg);
                    updater.set(AuthCompute {
                        status: AuthStatus::Failed(error_msg),
                    });
                }
            }
            Err(err) => {
                let error_msg = format!("Network error: {}", err);
                error!("SignUpCommand: {}", error_msg);
                updater.set(AuthCompute {
                    status: AuthStatus::Failed(error_msg),
                });
            }
        });
    }
}

/// Manual-only command that signs the current user out.
///
/// Posts the stored refresh token to `/auth/logout` so the server revokes it,
/// then clears the local session no matter what the server answered.
///
/// Dispatch explicitly via `ctx.dispatch::<SignOutCommand>()`.
#[derive(Default, Debug)]
pub struct SignOutCommand;

impl Command for SignOutCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let client = deps.get_state_ref::<ApiClient>();
        let store = client.session_store();

        let Some(session) = store.get() else {
            info!("SignOutCommand: no session stored");
            updater.set(AuthCompute {
                status: AuthStatus::Anonymous,
            });
            return;
        };

        info!("SignOutCommand: signing out '{}'", session.user.email);

        match serde_json::to_vec(&RefreshRequest {
            refresh_token: session.refresh_token.clone(),
        }) {
            Ok(body) => {
                let mut request = ehttp::Request::post(&client.url("/auth/logout"), body);
                request.headers.insert("Content-Type", "application/json");
                client.send(request, move |result| match result {
                    Ok(response) if response.status == 204 => {
                        info!("SignOutCommand: server session revoked");
                    }
                    Ok(response) => {
                        warn!("SignOutCommand: logout returned status {}", response.status);
                    }
                    Err(err) => {
                        warn!("SignOutCommand: logout request failed: {}", err);
                    }
                });
            }
            Err(e) => {
                error!("SignOutCommand: Failed to serialize RefreshRequest: {}", e);
            }
        }

        // The local session dies regardless of the server's answer.
        store.clear();
        updater.set(AuthCompute {
            status: AuthStatus::Anonymous,
        });
    }
}
