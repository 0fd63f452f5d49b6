//! Admin dashboard counters.

use std::any::Any;

use log::{error, info};
use serde::Deserialize;
use taskdeck_states::{
    Command, Compute, ComputeDeps, ComputeStage, Dep, Updater, assign_impl,
};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Counters reported by `GET /admin/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardResponse {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub suspended_users: u64,
    pub total_tasks: u64,
    pub todo_tasks: u64,
    pub in_progress_tasks: u64,
    pub done_tasks: u64,
    pub today_new_users: u64,
}

/// Status/result of the dashboard fetch.
#[derive(Debug, Clone, Default)]
pub enum AdminDashboardStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Fetch in flight.
    Loading,
    /// Current counters.
    Loaded(AdminDashboardResponse),
    /// The fetch failed with this error message.
    Error(String),
}

/// Compute-shaped cache for the admin dashboard page.
#[derive(Debug, Clone, Default)]
pub struct AdminDashboardCompute {
    pub status: AdminDashboardStatus,
}

impl AdminDashboardCompute {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, AdminDashboardStatus::Loading)
    }

    pub fn stats(&self) -> Option<&AdminDashboardResponse> {
        match &self.status {
            AdminDashboardStatus::Loaded(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            AdminDashboardStatus::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Whether the page should dispatch [`LoadAdminDashboardCommand`].
    pub fn needs_fetch(&self) -> bool {
        matches!(self.status, AdminDashboardStatus::Idle)
    }
}

impl Compute for AdminDashboardCompute {
    fn deps(&self) -> ComputeDeps {
        // Cache updated by a command; no derived dependencies.
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep, _updater: Updater) -> ComputeStage {
        // Intentionally no-op.
        //
        // Dispatch `LoadAdminDashboardCommand` to update this compute.
        ComputeStage::Finished
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any>) {
        assign_impl(self, new_self);
    }
}

/// Manual-only command that fetches the dashboard counters.
///
/// Dispatch explicitly via `ctx.dispatch::<LoadAdminDashboardCommand>()`.
#[derive(Default, Debug)]
pub struct LoadAdminDashboardCommand;

impl Command for LoadAdminDashboardCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let client = deps.get_state_ref::<ApiClient>();

        info!("LoadAdminDashboardCommand: fetching dashboard stats");

        updater.set(AdminDashboardCompute {
            status: AdminDashboardStatus::Loading,
        });

        let url = client.url("/admin/dashboard");
        client.send(ehttp::Request::get(url), move |result| match result {
            Ok(response) => {
                if response.status == 200 {
                    match serde_json::from_slice::<AdminDashboardResponse>(&response.bytes) {
                        Ok(stats) => {
                            updater.set(AdminDashboardCompute {
                                status: AdminDashboardStatus::Loaded(stats),
                            });
                        }
                        Err(e) => {
                            error!(
                                "LoadAdminDashboardCommand: Failed to parse AdminDashboardResponse: {}",
                                e
                            );
                            updater.set(AdminDashboardCompute {
                                status: AdminDashboardStatus::Error(
                                    "Failed to parse server response".to_string(),
                                ),
                            });
                        }
                    }
                } else {
                    let error = ApiError::from_response(&response);
                    error!("LoadAdminDashboardCommand: {}", error);
                    updater.set(AdminDashboardCompute {
                        status: AdminDashboardStatus::Error(error.to_string()),
                    });
                }
            }
            Err(err) => {
                let error_msg = format!("Network error: {}", err);
                error!("LoadAdminDashboardCommand: {}", error_msg);
                updater.set(AdminDashboardCompute {
                    status: AdminDashboardStatus::Error(error_msg),
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_response_deserialization() {
        let json = r#"{
            "totalUsers": 25,
            "activeUsers": 20,
            "inactiveUsers": 3,
            "suspendedUsers": 2,
            "totalTasks": 140,
            "todoTasks": 50,
            "inProgressTasks": 40,
            "doneTasks": 45,
            "todayNewUsers": 4
        }"#;
        let stats: AdminDashboardResponse = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(stats.total_users, 25);
        assert_eq!(stats.in_progress_tasks, 40);
        assert_eq!(stats.today_new_users, 4);
    }

    #[test]
    fn test_dashboard_compute_needs_fetch_only_when_idle() {
        assert!(AdminDashboardCompute::default().needs_fetch());
        let loaded = AdminDashboardCompute {
            status: AdminDashboardStatus::Loaded(AdminDashboardResponse::default()),
        };
        assert!(!loaded.needs_fetch());
        assert!(loaded.stats().is_some());
    }
}
