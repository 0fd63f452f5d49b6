//! Tasks domain module.
//!
//! This module is the single home for:
//! - State stored in `StateCtx` for the tasks pages (list query, form fields)
//! - Computes that cache fetched pages and action outcomes
//! - Commands covering the `/tasks` endpoints
//!
//! UI code should only read via `ctx.cached::<T>()` and trigger changes via
//! `ctx.dispatch::<Cmd>()`.

pub mod action_compute;
pub mod editor;
pub mod list_compute;
pub mod types;

pub use action_compute::{
    DeleteTaskCommand, ResetTaskActionCommand, SaveTaskCommand, TaskActionCompute,
    TaskActionInput, TaskActionKind, TaskActionState,
};

pub use editor::{
    LoadTaskCommand, TaskEditorCompute, TaskEditorInput, TaskEditorStatus, TaskFormValidation,
};

pub use list_compute::{RefreshTasksCommand, TaskListCompute, TaskListQuery, TaskListStatus};

pub use types::{TaskPriority, TaskRequest, TaskResponse, TaskStatus};
