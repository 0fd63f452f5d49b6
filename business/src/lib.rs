//! Business layer for the taskdeck client.
//!
//! Everything the UI needs lives behind `StateCtx`:
//! - `State` types hold raw inputs (form fields, the current route)
//! - `Compute` types cache fetched or derived results
//! - `Command` types do the network IO through the authenticated pipeline
//!
//! UI code reads via `ctx.cached::<T>()` / `ctx.state::<T>()` and triggers
//! changes via `ctx.dispatch::<Cmd>()`; it never talks to the server itself.

pub mod admin;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch_service;
pub mod paging;
pub mod profile;
pub mod route;
pub mod session;
pub mod tasks;

mod test_utils;

use taskdeck_states::StateCtx;

pub use client::{ApiClient, RequestTrace, RetryPhase};
pub use config::AppConfig;
pub use error::{ApiError, FieldError};
pub use fetch_service::{EhttpFetcher, FetchService};
pub use paging::{Page, SortDir};
pub use route::Route;
pub use session::{
    AuthUser, MemorySessionStore, Role, STORAGE_KEY_ACCESS_TOKEN, STORAGE_KEY_REFRESH_TOKEN,
    STORAGE_KEY_USER, Session, SessionEvent, SessionStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use fetch_service::{MockFetcher, scripted_response};

/// Register every state, compute and command this crate defines.
///
/// The app shell and the test harness both build their `StateCtx` through
/// here so the two never drift apart. When the client already holds a
/// restored session, the auth compute starts out signed in.
pub fn register_defaults(ctx: &mut StateCtx, config: AppConfig, client: ApiClient) {
    let auth = match client.current_user() {
        Some(user) => auth::AuthCompute::signed_in(user),
        None => auth::AuthCompute::default(),
    };

    ctx.add_state(config);
    ctx.add_state(client);
    ctx.add_state(Route::default());
    ctx.add_state(auth::CredentialsInput::default());
    ctx.add_state(tasks::TaskListQuery::default());
    ctx.add_state(tasks::TaskEditorInput::default());
    ctx.add_state(tasks::TaskActionInput::default());
    ctx.add_state(profile::ProfileInput::default());
    ctx.add_state(admin::AdminUserEditInput::default());
    ctx.add_state(admin::AdminActionInput::default());

    ctx.record_compute(auth);
    ctx.record_compute(tasks::TaskListCompute::default());
    ctx.record_compute(tasks::TaskFormValidation::default());
    ctx.record_compute(tasks::TaskEditorCompute::default());
    ctx.record_compute(tasks::TaskActionCompute::default());
    ctx.record_compute(profile::ProfileCompute::default());
    ctx.record_compute(profile::ProfileActionCompute::default());
    ctx.record_compute(admin::AdminDashboardCompute::default());
    ctx.record_compute(admin::AdminUsersCompute::default());
    ctx.record_compute(admin::AdminUserEditCompute::default());
    ctx.record_compute(admin::AdminActionCompute::default());

    ctx.record_command(auth::SignInCommand);
    ctx.record_command(auth::SignUpCommand);
    ctx.record_command(auth::SignOutCommand);
    ctx.record_command(tasks::RefreshTasksCommand);
    ctx.record_command(tasks::LoadTaskCommand);
    ctx.record_command(tasks::SaveTaskCommand);
    ctx.record_command(tasks::DeleteTaskCommand);
    ctx.record_command(tasks::ResetTaskActionCommand);
    ctx.record_command(profile::LoadProfileCommand);
    ctx.record_command(profile::UpdateProfileCommand);
    ctx.record_command(profile::ResetProfileActionCommand);
    ctx.record_command(admin::LoadAdminDashboardCommand);
    ctx.record_command(admin::RefreshAdminUsersCommand);
    ctx.record_command(admin::LoadAdminUserCommand);
    ctx.record_command(admin::UpdateAdminUserCommand);
    ctx.record_command(admin::DeleteAdminUserCommand);
    ctx.record_command(admin::ResetAdminActionCommand);
}
