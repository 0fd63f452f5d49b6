//! Task list cache + refresh command.
//!
//! Command-driven cache pattern:
//! - `TaskListCompute` stores the latest page together with the query it was
//!   fetched for.
//! - `RefreshTasksCommand` performs the network call and updates the compute
//!   via `Updater::set()`.
//!
//! The tasks page compares `fetched_query` against the live [`TaskListQuery`]
//! each frame and dispatches the command when they differ, so search edits and
//! pagination clicks turn into fetches without explicit wiring. Mutating
//! commands drop in [`TaskListCompute::reset`] so the next frame re-fetches.

use std::any::Any;

use log::{error, info};
use taskdeck_states::{
    Command, Compute, ComputeDeps, ComputeStage, Dep, State, Updater, assign_impl,
};

use crate::client::ApiClient;
use crate::error::extract_error_message;
use crate::paging::{Page, SortDir, page_query_string};
use crate::tasks::types::TaskResponse;

/// Server-driven list parameters for the tasks table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Zero-based page index.
    pub page: u64,
    pub size: u64,
    /// Matched against title and description server-side.
    pub search: String,
    pub sort_by: String,
    pub sort_dir: SortDir,
}

impl Default for TaskListQuery {
    fn default() -> Self {
        // Mirrors the server's own defaults.
        Self {
            page: 0,
            size: 10,
            search: String::new(),
            sort_by: "createdAt".to_string(),
            sort_dir: SortDir::Desc,
        }
    }
}

impl TaskListQuery {
    pub fn query_string(&self) -> String {
        page_query_string(
            self.page,
            self.size,
            &self.search,
            &self.sort_by,
            self.sort_dir,
        )
    }
}

impl State for TaskListQuery {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Status/result of the task list call.
#[derive(Debug, Clone, Default)]
pub enum TaskListStatus {
    /// No request has been made yet (or the cache was reset).
    #[default]
    Idle,
    /// A refresh is currently in flight.
    Loading,
    /// The last refresh succeeded with this page.
    Loaded(Page<TaskResponse>),
    /// The last refresh failed with this error message.
    Error(String),
}

/// Compute-shaped cache for the tasks table.
#[derive(Debug, Clone, Default)]
pub struct TaskListCompute {
    pub status: TaskListStatus,
    /// The query the current `status` answers; `None` after a reset.
    pub fetched_query: Option<TaskListQuery>,
}

impl TaskListCompute {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, TaskListStatus::Loading)
    }

    pub fn page(&self) -> Option<&Page<TaskResponse>> {
        match &self.status {
            TaskListStatus::Loaded(page) => Some(page),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            TaskListStatus::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Whether the cache answers `query`. The page dispatches
    /// [`RefreshTasksCommand`] when it does not.
    pub fn is_stale(&self, query: &TaskListQuery) -> bool {
        self.fetched_query.as_ref() != Some(query)
    }

    /// A cleared cache. Mutating commands publish this so the next frame
    /// re-fetches the same query.
    pub fn reset() -> Self {
        Self::default()
    }
}

impl Compute for TaskListCompute {
    fn deps(&self) -> ComputeDeps {
        // Cache updated by a command; no derived dependencies.
        const STATE_IDS: [std::any::TypeId; 0] = [];
        const COMPUTE_IDS: [std::any::TypeId; 0] = [];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, _deps: Dep, _updater: Updater) -> ComputeStage {
        // Intentionally no-op.
        //
        // Side effects (network) must not run inside a Compute due to implicit
        // execution. Dispatch `RefreshTasksCommand` to update this compute.
        ComputeStage::Finished
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any>) {
        assign_impl(self, new_self);
    }
}

/// Manual-only command that fetches the current page of tasks.
///
/// ## Flow
///
/// 1. Reads the live `TaskListQuery`
/// 2. Sets the cache to `Loading` for that query
/// 3. Makes an authenticated GET to `/tasks` with the query string
/// 4. On success, stores the parsed page; on failure, the error message
///
/// Dispatch explicitly via `ctx.dispatch::<RefreshTasksCommand>()`.
#[derive(Default, Debug)]
pub struct RefreshTasksCommand;

impl Command for RefreshTasksCommand {
    fn run(&self, deps: Dep, updater: Updater) {
        let query = deps.get_state_ref::<TaskListQuery>().clone();
        let client = deps.get_state_ref::<ApiClient>();

        info!(
            "RefreshTasksCommand: fetching page {} (size {})",
            query.page, query.size
        );

        updater.set(TaskListCompute {
            status: TaskListStatus::Loading,
            fetched_query: Some(query.clone()),
        });

        let url = client.url(&format!("/tasks{}", query.query_string()));
        client.send(ehttp::Request::get(url), move |result| match result {
            Ok(response) => {
                if response.status == 200 {
                    match serde_json::from_slice::<Page<TaskResponse>>(&response.bytes) {
                        Ok(page) => {
                            info!(
                                "RefreshTasksCommand: loaded {} of {} tasks",
                                page.content.len(),
                                page.total_elements
                            );
                            updater.set(TaskListCompute {
                                status: TaskListStatus::Loaded(page),
                                fetched_query: Some(query),
                            });
                        }
                        Err(e) => {
                            error!("RefreshTasksCommand: Failed to parse task page: {}", e);
                            updater.set(TaskListCompute {
                                status: TaskListStatus::Error(
                                    "Failed to parse server response".to_string(),
                                ),
                                fetched_query: Some(query),
                            });
                        }
                    }
                } else {
                    let error_msg = extract_error_message(
                        &response.bytes,
                        &format!("Server error (status {})", response.status),
                    );
                    error!("RefreshTasksCommand: {}", error_msg);
                    updater.set(TaskListCompute {
                        status: TaskListStatus::Error(error_msg),
                        fetched_query: Some(query),
                    });
                }
            }
            Err(err) => {
                let error_msg = format!("Network error: {}", err);
                error!("RefreshTasksCommand: {}", error_msg);
                updater.set(TaskListCompute {
                    status: TaskListStatus::Error(error_msg),
                    fetched_query: Some(query),
                });
            }
        });
    }
}
