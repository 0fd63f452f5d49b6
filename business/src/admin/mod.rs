//! Admin domain module.
//!
//! This module is the single home for:
//! - Wire types for `/admin/*` endpoints (dashboard counters, user directory)
//! - State stored in `StateCtx` for the admin screens (edit form, delete target)
//! - Computes that cache fetched results and action outcomes
//!
//! UI code under `ui/src/pages/**` should not define domain `State`/`Compute`/`Command`.
//! It should only read via `ctx.cached::<T>()` and trigger changes via `ctx.dispatch::<Cmd>()`.

pub mod dashboard;
pub mod user_edit;
pub mod users;

pub use dashboard::{AdminDashboardCompute, AdminDashboardResponse, LoadAdminDashboardCommand};

pub use user_edit::{
    AdminActionCompute, AdminActionInput, AdminActionKind, AdminActionState, AdminUserEditCompute,
    AdminUserEditInput, DeleteAdminUserCommand, LoadAdminUserCommand, ResetAdminActionCommand,
    UpdateAdminUserCommand,
};

pub use users::{
    AdminUserResponse, AdminUserUpdateRequest, AdminUsersCompute, RefreshAdminUsersCommand,
    UserStatus,
};
