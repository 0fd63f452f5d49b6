//! Admin user directory: wire types and the list cache.
//!
//! The users screen loads the whole directory in one request and lets the
//! table filter, sort and page it locally, unlike the tasks list where every
//! interaction round-trips to the server.

use std::any::Any;

use chrono::NaiveDateTime;
use log::{error, info};
use serde::{Deserialize, Serialize};
use taskdeck_states::{
    Command, Compute, ComputeDeps, ComputeStage, Dep, Updater, assign_impl,
};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::paging::{Page, SortDir, page_query_string};
use crate::session::Role;

/// Rows fetched per request when loading the whole directory.
const DIRECTORY_PAGE_SIZE: u64 = 200;

/// Account standing, set by admins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub const ALL: [UserStatus; 3] = [
        UserStatus::Active,
        UserStatus::Inactive,
        UserStatus::Suspended,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
            UserStatus::Suspended => "Suspended",
        }
    }
}

/// One row of the admin user directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Role/status update payload for `PUT /admin/users/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserUpdateRequest {
    pub role: Role,
    pub status: UserStatus,
}

/// Status/result of the directory fetch.
#[derive(Debug, Clone, Default)]
pub enum AdminUsersStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Fetch in flight.
    Loading,
    /// All fetched rows, unfiltered and unsorted.
    Loaded(Vec<AdminUserResponse>),
    /// The fetch failed with this error message.
    Error(String),
}

/// Compute-shaped cache for the admin users screen.
///
/// Holds the full directory; filtering and paging happen in the table.
#[derive(Debug, Clone, Default)]
pub struct AdminUsersCompute {
    pub status: AdminUsersStatus,
}

impl AdminUsersCompute {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, AdminUsersStatus::Loading)
    }

    pub fn users(&self) -> &[AdminUserResponse] {
        match &self.status {
            AdminUsersStatus::Loaded(users) => users,
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            AdminUsersStatus::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Whether the page should dispatch [`RefreshAdminUsersCommand`].
    pub fn needs_fetch(&self) -> bool {
        matches!(self.status, AdminUsersStatus::Idle)
    }

    /// A cache that forgets its rows, forcing the next page visit to re-fetch.
    pub fn reset() -> Self {
        Self::default()
    }
}

impl Compute for AdminUsersCompute {
    fn deps(&self) -> ComputeDeps {
        // Cache updated by a command; no derived dependencies.
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep, _updater: Updater) -> ComputeStage {
        // Intentionally no-op.
        //
        // Dispatch `RefreshAdminUsersCommand` to update this compute.
        ComputeStage::Finished
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any>) {
        assign_impl(self, new_self);
    }
}

/// Manual-only command that fetches the user directory.
///
/// ## Flow
///
/// 1. Marks the cache `Loading`
/// 2. GETs one large page from `/admin/users` through the authenticated pipeline
/// 3. Publishes the rows (or the error) back into [`AdminUsersCompute`]
///
/// Dispatch explicitly via `ctx.dispatch::<RefreshAdminUsersCommand>()`.
#[derive(Default, Debug)]
pub struct RefreshAdminUsersCommand;

impl Command for RefreshAdminUsersCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let client = deps.get_state_ref::<ApiClient>();

        info!("RefreshAdminUsersCommand: fetching user directory");

        updater.set(AdminUsersCompute {
            status: AdminUsersStatus::Loading,
        });

        let query = page_query_string(0, DIRECTORY_PAGE_SIZE, "", "createdAt", SortDir::Desc);
        let url = client.url(&format!("/admin/users{query}"));
        client.send(ehttp::Request::get(url), move |result| match result {
            Ok(response) => {
                if response.status == 200 {
                    match serde_json::from_slice::<Page<AdminUserResponse>>(&response.bytes) {
                        Ok(page) => {
                            info!(
                                "RefreshAdminUsersCommand: loaded {} of {} users",
                                page.content.len(),
                                page.total_elements
                            );
                            updater.set(AdminUsersCompute {
                                status: AdminUsersStatus::Loaded(page.content),
                            });
                        }
                        Err(e) => {
                            error!("RefreshAdminUsersCommand: Failed to parse page: {}", e);
                            updater.set(AdminUsersCompute {
                                status: AdminUsersStatus::Error(
                                    "Failed to parse server response".to_string(),
                                ),
                            });
                        }
                    }
                } else {
                    let error = ApiError::from_response(&response);
                    error!("RefreshAdminUsersCommand: {}", error);
                    updater.set(AdminUsersCompute {
                        status: AdminUsersStatus::Error(error.to_string()),
                    });
                }
            }
            Err(err) => {
                let error_msg = format!("Network error: {}", err);
                error!("RefreshAdminUsersCommand: {}", error_msg);
                updater.set(AdminUsersCompute {
                    status: AdminUsersStatus::Error(error_msg),
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_user_deserialization() {
        let json = r#"{
            "id": 3,
            "email": "admin@taskdeck.dev",
            "name": "Admin",
            "role": "ADMIN",
            "status": "SUSPENDED",
            "createdAt": "2026-01-01T10:00:00",
            "updatedAt": "2026-02-01T10:00:00"
        }"#;
        let user: AdminUserResponse = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.status, UserStatus::Suspended);
    }

    #[test]
    fn test_update_request_uses_wire_names() {
        let payload = AdminUserUpdateRequest {
            role: Role::User,
            status: UserStatus::Inactive,
        };
        let json = serde_json::to_string(&payload).expect("Should serialize");
        assert_eq!(json, r#"{"role":"USER","status":"INACTIVE"}"#);
    }

    #[test]
    fn test_users_compute_defaults_to_fetchable_empty() {
        let compute = AdminUsersCompute::default();
        assert!(compute.needs_fetch());
        assert!(compute.users().is_empty());
        assert!(!compute.is_loading());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(UserStatus::Active.label(), "Active");
        assert_eq!(UserStatus::ALL.len(), 3);
    }
}
