//! Test utilities for business layer testing with mock servers.
//!
//! This module provides helpers to set up a mock HTTP backend and run the
//! business commands (SignIn, RefreshTasks, SaveTask, UpdateProfile, etc.)
//! end to end, including the transparent token renewal, without a real server.
//!
//! # Example
//!
//! ```ignore
//! use taskdeck_business::test_utils::TestContext;
//!
//! #[tokio::test]
//! async fn test_task_list() {
//!     let mut test_ctx = TestContext::new().await;
//!     test_ctx.set_session("A1", "R1");
//!
//!     // Mount a mock response for the list endpoint
//!     test_ctx.mock_tasks_page(vec![sample_task_body(1)], 1).await;
//!
//!     // Execute the command
//!     test_ctx.ctx.enqueue_command::<RefreshTasksCommand>();
//!     test_ctx
//!         .flush_and_wait(|ctx| !ctx.compute::<TaskListCompute>().is_loading())
//!         .await;
//!
//!     // Verify results
//!     let compute = test_ctx.ctx.compute::<TaskListCompute>();
//!     // ... assert on compute.status
//! }
//! ```

#![cfg(all(test, not(target_arch = "wasm32")))]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

use crate::auth::AuthCompute;
use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::fetch_service::EhttpFetcher;
use crate::session::{AuthUser, MemorySessionStore, Role, Session};
use taskdeck_states::StateCtx;

/// Test context that holds a mock server and a configured StateCtx.
pub struct TestContext {
    /// The mock server instance.
    pub mock_server: MockServer,
    /// The state context configured to use the mock server.
    pub ctx: StateCtx,
    /// The session store behind the context's `ApiClient`.
    pub store: Arc<MemorySessionStore>,
}

impl TestContext {
    /// Create a new test context with a fresh mock server.
    pub async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = AppConfig::new(mock_server.uri());

        let store = Arc::new(MemorySessionStore::new());
        let client = ApiClient::new(
            config.api_url(),
            Arc::new(EhttpFetcher),
            store.clone() as Arc<dyn crate::session::SessionStore>,
        );

        let mut ctx = StateCtx::new();
        crate::register_defaults(&mut ctx, config, client);

        Self {
            mock_server,
            ctx,
            store,
        }
    }

    /// Store a session and mark the auth compute signed in.
    pub fn set_session(&mut self, access: &str, refresh: &str) {
        self.set_session_with_role(access, refresh, Role::User);
    }

    /// Store an admin session and mark the auth compute signed in.
    pub fn set_admin_session(&mut self, access: &str, refresh: &str) {
        self.set_session_with_role(access, refresh, Role::Admin);
    }

    fn set_session_with_role(&mut self, access: &str, refresh: &str, role: Role) {
        let user = AuthUser {
            id: 7,
            email: "user@taskdeck.dev".to_string(),
            name: "Test User".to_string(),
            role,
        };
        self.store.set(Session {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            user: user.clone(),
        });

        // AuthCompute is a Compute, not a State, so it goes through the Updater
        let updater = self.ctx.updater();
        updater.set(AuthCompute::signed_in(user));
        self.ctx.sync_computes();
    }

    /// Flush all pending commands and wait until `settled` holds.
    ///
    /// Responses land on the fetcher's worker thread and reach the context
    /// through the updater channel, so this polls:
    /// 1. Sync any pending compute updates
    /// 2. Flush the command queue (fires the requests)
    /// 3. Sync in a loop until the caller's condition is met
    pub async fn flush_and_wait(&mut self, mut settled: impl FnMut(&StateCtx) -> bool) {
        self.ctx.sync_computes();
        self.ctx.flush_commands();

        let timeout = Duration::from_secs(5);
        let start = std::time::Instant::now();

        loop {
            self.ctx.sync_computes();
            if settled(&self.ctx) {
                break;
            }
            if start.elapsed() > timeout {
                panic!("Timed out waiting for the mock responses to land");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        // Final sync so updates published together with the awaited one apply
        self.ctx.sync_computes();
    }

    // =========================================================================
    // Mock endpoint helpers
    // =========================================================================

    /// Mock the login endpoint.
    pub async fn mock_login(&self, success: bool, access: &str, refresh: &str) {
        let response = if success {
            ResponseTemplate::new(200).set_body_json(auth_body(access, refresh, "USER"))
        } else {
            ResponseTemplate::new(401)
                .set_body_json(error_body(401, "Invalid email or password", "/api/auth/login"))
        };

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the signup endpoint.
    pub async fn mock_signup(&self, access: &str, refresh: &str) {
        let response = ResponseTemplate::new(201).set_body_json(auth_body(access, refresh, "USER"));

        Mock::given(method("POST"))
            .and(path("/api/auth/signup"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the token refresh endpoint.
    pub async fn mock_refresh(&self, success: bool, access: &str, refresh: &str) {
        let response = if success {
            ResponseTemplate::new(200).set_body_json(auth_body(access, refresh, "USER"))
        } else {
            ResponseTemplate::new(401)
                .set_body_json(error_body(401, "Invalid refresh token", "/api/auth/refresh"))
        };

        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the logout endpoint.
    pub async fn mock_logout(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/api/auth/logout"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    /// Answer one request to `api_path` with 401, then stop matching.
    ///
    /// Mount this before the success mock for the same path to script an
    /// expired access token followed by a renewed retry.
    pub async fn mock_unauthorized_once(&self, http_method: &str, api_path: &str) {
        Mock::given(method(http_method))
            .and(path(api_path))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(error_body(401, "Authentication required", api_path)),
            )
            .up_to_n_times(1)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the task list endpoint.
    pub async fn mock_tasks_page(&self, tasks: Vec<serde_json::Value>, total: u64) {
        let response = ResponseTemplate::new(200).set_body_json(page_body(tasks, total));

        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the task list endpoint, requiring a specific bearer token.
    pub async fn mock_tasks_page_for_bearer(
        &self,
        bearer: &str,
        tasks: Vec<serde_json::Value>,
        total: u64,
    ) {
        let response = ResponseTemplate::new(200).set_body_json(page_body(tasks, total));

        Mock::given(method("GET"))
            .and(path("/api/tasks"))
            .and(header("Authorization", format!("Bearer {bearer}").as_str()))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the single task endpoint.
    pub async fn mock_task(&self, task: serde_json::Value) {
        let id = task["id"].as_i64().unwrap_or_default();
        let response = ResponseTemplate::new(200).set_body_json(task);

        Mock::given(method("GET"))
            .and(path(format!("/api/tasks/{}", id)))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock task creation.
    pub async fn mock_create_task(&self, task: serde_json::Value) {
        let response = ResponseTemplate::new(201).set_body_json(task);

        Mock::given(method("POST"))
            .and(path("/api/tasks"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock task deletion.
    pub async fn mock_delete_task(&self, id: i64) {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/tasks/{}", id)))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the profile endpoint.
    pub async fn mock_profile(&self, user: serde_json::Value) {
        let response = ResponseTemplate::new(200).set_body_json(user);

        Mock::given(method("GET"))
            .and(path("/api/users/me"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the profile update endpoint.
    pub async fn mock_update_profile(&self, user: serde_json::Value) {
        let response = ResponseTemplate::new(200).set_body_json(user);

        Mock::given(method("PUT"))
            .and(path("/api/users/me"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the admin dashboard endpoint.
    pub async fn mock_dashboard(&self, stats: serde_json::Value) {
        let response = ResponseTemplate::new(200).set_body_json(stats);

        Mock::given(method("GET"))
            .and(path("/api/admin/dashboard"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the admin user directory endpoint.
    pub async fn mock_admin_users(&self, users: Vec<serde_json::Value>, total: u64) {
        let response = ResponseTemplate::new(200).set_body_json(page_body(users, total));

        Mock::given(method("GET"))
            .and(path("/api/admin/users"))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the admin single-user update endpoint.
    pub async fn mock_update_admin_user(&self, user: serde_json::Value) {
        let id = user["id"].as_i64().unwrap_or_default();
        let response = ResponseTemplate::new(200).set_body_json(user);

        Mock::given(method("PUT"))
            .and(path(format!("/api/admin/users/{}", id)))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the admin user deletion endpoint.
    pub async fn mock_delete_admin_user(&self, id: i64) {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/admin/users/{}", id)))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.mock_server)
            .await;
    }
}

/// Auth response body the way the backend builds it.
pub fn auth_body(access: &str, refresh: &str, role: &str) -> serde_json::Value {
    json!({
        "accessToken": access,
        "refreshToken": refresh,
        "tokenType": "Bearer",
        "expiresIn": 900000,
        "user": {
            "id": 7,
            "email": "user@taskdeck.dev",
            "name": "Test User",
            "role": role
        }
    })
}

/// Error envelope body the way the backend builds it.
pub fn error_body(status: u16, message: &str, api_path: &str) -> serde_json::Value {
    json!({
        "status": status,
        "error": "Unauthorized",
        "message": message,
        "path": api_path,
        "timestamp": "2026-01-15T09:30:00"
    })
}

/// One page of rows the way the backend builds it.
pub fn page_body(content: Vec<serde_json::Value>, total: u64) -> serde_json::Value {
    let count = content.len() as u64;
    json!({
        "content": content,
        "page": 0,
        "size": 10,
        "totalElements": total,
        "totalPages": total.div_ceil(10),
        "first": true,
        "last": count >= total
    })
}

/// Helper to create a sample task body for testing.
pub fn sample_task_body(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Task {}", id),
        "description": "Test description",
        "status": "TODO",
        "priority": "MEDIUM",
        "userId": 7,
        "userName": "Test User",
        "createdAt": "2026-01-15T09:30:00",
        "updatedAt": "2026-01-15T09:30:00"
    })
}

/// Helper to create a sample profile body for testing.
pub fn sample_profile_body(name: &str) -> serde_json::Value {
    json!({
        "id": 7,
        "email": "user@taskdeck.dev",
        "name": name,
        "role": "USER",
        "createdAt": "2026-01-01T10:00:00",
        "updatedAt": "2026-02-01T10:00:00"
    })
}

/// Helper to create a sample admin directory row for testing.
pub fn sample_admin_user_body(id: i64, role: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "email": format!("user{}@taskdeck.dev", id),
        "name": format!("User {}", id),
        "role": role,
        "status": status,
        "createdAt": "2026-01-15T09:30:00",
        "updatedAt": "2026-01-15T09:30:00"
    })
}

/// Helper to create a sample dashboard body for testing.
pub fn sample_dashboard_body() -> serde_json::Value {
    json!({
        "totalUsers": 25,
        "activeUsers": 20,
        "inactiveUsers": 3,
        "suspendedUsers": 2,
        "totalTasks": 140,
        "todoTasks": 50,
        "inProgressTasks": 40,
        "doneTasks": 45,
        "todayNewUsers": 4
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::{
        AdminActionCompute, AdminDashboardCompute, AdminUserEditInput, AdminUsersCompute,
        LoadAdminDashboardCommand, RefreshAdminUsersCommand, UpdateAdminUserCommand, UserStatus,
    };
    use crate::auth::{CredentialsInput, SignInCommand, SignOutCommand};
    use crate::profile::{ProfileActionCompute, ProfileInput, UpdateProfileCommand};
    use crate::session::SessionEvent;
    use crate::tasks::{
        LoadTaskCommand, RefreshTasksCommand, SaveTaskCommand, TaskActionCompute, TaskEditorCompute,
        TaskEditorInput, TaskListCompute, TaskListQuery,
    };

    #[tokio::test]
    async fn test_context_creation() {
        let test_ctx = TestContext::new().await;
        // Verify the mock server is running
        assert!(!test_ctx.mock_server.uri().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_flow_stores_session() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.mock_login(true, "A1", "R1").await;

        test_ctx.ctx.update::<CredentialsInput>(|input| {
            input.email = "user@taskdeck.dev".to_string();
            input.password = "secret123".to_string();
        });
        test_ctx.ctx.enqueue_command::<SignInCommand>();
        test_ctx
            .flush_and_wait(|ctx| {
                let auth = ctx.compute::<AuthCompute>();
                auth.is_authenticated() || auth.error().is_some()
            })
            .await;

        let auth = test_ctx.ctx.compute::<AuthCompute>();
        assert!(auth.is_authenticated(), "expected sign-in, got {:?}", auth);
        assert_eq!(auth.user().map(|u| u.name.as_str()), Some("Test User"));

        let session = test_ctx.store.get().expect("session should be stored");
        assert_eq!(session.access_token, "A1");
        assert_eq!(session.refresh_token, "R1");
    }

    #[tokio::test]
    async fn test_sign_in_rejected_keeps_anonymous() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.mock_login(false, "", "").await;

        test_ctx.ctx.update::<CredentialsInput>(|input| {
            input.email = "user@taskdeck.dev".to_string();
            input.password = "wrong".to_string();
        });
        test_ctx.ctx.enqueue_command::<SignInCommand>();
        test_ctx
            .flush_and_wait(|ctx| ctx.compute::<AuthCompute>().error().is_some())
            .await;

        let auth = test_ctx.ctx.compute::<AuthCompute>();
        assert_eq!(auth.error(), Some("Invalid email or password"));
        assert!(test_ctx.store.get().is_none());
    }

    #[tokio::test]
    async fn test_task_list_fetch_populates_cache() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.set_session("A1", "R1");
        test_ctx
            .mock_tasks_page(vec![sample_task_body(1), sample_task_body(2)], 2)
            .await;

        test_ctx.ctx.enqueue_command::<RefreshTasksCommand>();
        test_ctx
            .flush_and_wait(|ctx| ctx.compute::<TaskListCompute>().page().is_some())
            .await;

        let list = test_ctx.ctx.compute::<TaskListCompute>();
        let page = list.page().expect("page should be loaded");
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].title, "Task 1");

        let query = test_ctx.ctx.state::<TaskListQuery>().clone();
        assert!(!list.is_stale(&query));
    }

    #[tokio::test]
    async fn test_expired_access_token_renews_and_retries() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.set_session("expired", "R1");

        // First list request answers 401, the renewed retry must carry A2
        test_ctx.mock_unauthorized_once("GET", "/api/tasks").await;
        test_ctx.mock_refresh(true, "A2", "R2").await;
        test_ctx
            .mock_tasks_page_for_bearer("A2", vec![sample_task_body(1)], 1)
            .await;

        test_ctx.ctx.enqueue_command::<RefreshTasksCommand>();
        test_ctx
            .flush_and_wait(|ctx| !ctx.compute::<TaskListCompute>().is_loading())
            .await;

        let list = test_ctx.ctx.compute::<TaskListCompute>();
        let page = list.page().expect("retried fetch should succeed");
        assert_eq!(page.content.len(), 1);

        let session = test_ctx.store.get().expect("session should survive renewal");
        assert_eq!(session.access_token, "A2");
        assert_eq!(session.refresh_token, "R2");
        assert_eq!(session.user.name, "Test User");
    }

    #[tokio::test]
    async fn test_failed_renewal_clears_session() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.set_session("expired", "stale");
        let events = test_ctx.store.subscribe();

        test_ctx.mock_unauthorized_once("GET", "/api/tasks").await;
        test_ctx.mock_refresh(false, "", "").await;

        test_ctx.ctx.enqueue_command::<RefreshTasksCommand>();
        test_ctx
            .flush_and_wait(|ctx| ctx.compute::<TaskListCompute>().error_message().is_some())
            .await;

        assert!(test_ctx.store.get().is_none());
        assert_eq!(
            events.try_iter().last(),
            Some(SessionEvent::Cleared),
            "store should announce the forced logout"
        );
    }

    #[tokio::test]
    async fn test_load_task_fills_editor_cache() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.set_session("A1", "R1");
        test_ctx.mock_task(sample_task_body(3)).await;

        test_ctx
            .ctx
            .update::<TaskEditorInput>(|input| input.reset_for_edit(3));
        test_ctx.ctx.enqueue_command::<LoadTaskCommand>();
        test_ctx
            .flush_and_wait(|ctx| ctx.compute::<TaskEditorCompute>().task().is_some())
            .await;

        let editor = test_ctx.ctx.compute::<TaskEditorCompute>();
        assert!(!editor.is_stale(3));
        assert_eq!(editor.task().map(|t| t.title.as_str()), Some("Task 3"));
    }

    #[tokio::test]
    async fn test_save_task_resets_list_cache() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.set_session("A1", "R1");

        // Fill the list cache first so the reset is observable
        test_ctx.mock_tasks_page(vec![sample_task_body(1)], 1).await;
        test_ctx.ctx.enqueue_command::<RefreshTasksCommand>();
        test_ctx
            .flush_and_wait(|ctx| ctx.compute::<TaskListCompute>().page().is_some())
            .await;

        test_ctx.mock_create_task(sample_task_body(9)).await;
        test_ctx.ctx.update::<TaskEditorInput>(|input| {
            input.reset_for_create();
            input.title = "Write release notes".to_string();
        });
        test_ctx.ctx.enqueue_command::<SaveTaskCommand>();
        test_ctx
            .flush_and_wait(|ctx| ctx.compute::<TaskActionCompute>().succeeded().is_some())
            .await;

        let query = test_ctx.ctx.state::<TaskListQuery>().clone();
        let list = test_ctx.ctx.compute::<TaskListCompute>();
        assert!(list.is_stale(&query), "save should force a list re-fetch");
    }

    #[tokio::test]
    async fn test_profile_update_refreshes_session_name() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.set_session("A1", "R1");
        test_ctx
            .mock_update_profile(sample_profile_body("Renamed User"))
            .await;

        test_ctx
            .ctx
            .update::<ProfileInput>(|input| input.name = "Renamed User".to_string());
        test_ctx.ctx.enqueue_command::<UpdateProfileCommand>();
        test_ctx
            .flush_and_wait(|ctx| ctx.compute::<ProfileActionCompute>().succeeded())
            .await;

        let session = test_ctx.store.get().expect("session should be kept");
        assert_eq!(session.user.name, "Renamed User");

        let auth = test_ctx.ctx.compute::<AuthCompute>();
        assert_eq!(auth.user().map(|u| u.name.as_str()), Some("Renamed User"));
    }

    #[tokio::test]
    async fn test_profile_update_rejects_short_name_without_request() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.set_session("A1", "R1");
        // No mock mounted: the command must fail before sending anything.

        test_ctx
            .ctx
            .update::<ProfileInput>(|input| input.name = "X".to_string());
        test_ctx.ctx.enqueue_command::<UpdateProfileCommand>();
        test_ctx
            .flush_and_wait(|ctx| {
                ctx.compute::<ProfileActionCompute>()
                    .error_message()
                    .is_some()
            })
            .await;

        let action = test_ctx.ctx.compute::<ProfileActionCompute>();
        assert_eq!(
            action.field_message("name"),
            Some("Name must be between 2 and 100 characters")
        );
    }

    #[tokio::test]
    async fn test_sign_out_clears_session_even_if_server_fails() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.set_session("A1", "R1");
        test_ctx.mock_logout(500).await;

        test_ctx.ctx.enqueue_command::<SignOutCommand>();
        test_ctx
            .flush_and_wait(|ctx| !ctx.compute::<AuthCompute>().is_authenticated())
            .await;

        assert!(test_ctx.store.get().is_none());
    }

    #[tokio::test]
    async fn test_admin_dashboard_counters_load() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.set_admin_session("A1", "R1");
        test_ctx.mock_dashboard(sample_dashboard_body()).await;

        test_ctx.ctx.enqueue_command::<LoadAdminDashboardCommand>();
        test_ctx
            .flush_and_wait(|ctx| ctx.compute::<AdminDashboardCompute>().stats().is_some())
            .await;

        let dashboard = test_ctx.ctx.compute::<AdminDashboardCompute>();
        let stats = dashboard.stats().expect("stats should be loaded");
        assert_eq!(stats.total_users, 25);
        assert_eq!(stats.done_tasks, 45);
    }

    #[tokio::test]
    async fn test_admin_user_update_resets_directory() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.set_admin_session("A1", "R1");

        test_ctx
            .mock_admin_users(
                vec![sample_admin_user_body(5, "USER", "ACTIVE")],
                1,
            )
            .await;
        test_ctx.ctx.enqueue_command::<RefreshAdminUsersCommand>();
        test_ctx
            .flush_and_wait(|ctx| !ctx.compute::<AdminUsersCompute>().users().is_empty())
            .await;

        test_ctx
            .mock_update_admin_user(sample_admin_user_body(5, "USER", "SUSPENDED"))
            .await;
        test_ctx.ctx.update::<AdminUserEditInput>(|input| {
            input.reset_for(5);
            input.status = UserStatus::Suspended;
        });
        test_ctx.ctx.enqueue_command::<UpdateAdminUserCommand>();
        test_ctx
            .flush_and_wait(|ctx| ctx.compute::<AdminActionCompute>().succeeded().is_some())
            .await;

        let directory = test_ctx.ctx.compute::<AdminUsersCompute>();
        assert!(directory.needs_fetch(), "update should force a re-fetch");
    }
}
