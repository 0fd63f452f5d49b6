use std::sync::Arc;

use taskdeck_business::admin::AdminUserResponse;
use taskdeck_business::auth::AuthCompute;
use taskdeck_business::tasks::TaskResponse;
use taskdeck_business::{
    ApiClient, AppConfig, AuthUser, EhttpFetcher, MemorySessionStore, Session, SessionEvent,
    SessionStore, register_defaults,
};
use taskdeck_states::StateCtx;

use crate::pages::{USERS_PAGE_SIZE, admin_user_table_columns, task_table_columns};
use crate::widgets::table::DataTable;

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
    /// In-memory session snapshot; the app shell mirrors it into persisted
    /// storage and restores it on startup.
    pub(crate) store: Arc<MemorySessionStore>,
    /// Session changes the shell reacts to: sign-out and failed renewal
    /// both surface here as `Cleared`.
    pub(crate) session_events: flume::Receiver<SessionEvent>,
    /// Widget state for the server-driven tasks table.
    pub tasks_table: DataTable<TaskResponse>,
    /// Widget state for the locally-paged user directory.
    pub admin_users_table: DataTable<AdminUserResponse>,
}

impl Default for State {
    fn default() -> Self {
        Self::with_config(AppConfig::default())
    }
}

impl State {
    fn with_config(config: AppConfig) -> Self {
        let mut ctx = StateCtx::new();
        let store = Arc::new(MemorySessionStore::new());
        let session_events = store.subscribe();
        let client = ApiClient::new(
            config.api_url(),
            Arc::new(EhttpFetcher),
            Arc::clone(&store) as Arc<dyn SessionStore>,
        );
        register_defaults(&mut ctx, config, client);

        Self {
            ctx,
            store,
            session_events,
            tasks_table: DataTable::server_driven(task_table_columns()),
            admin_users_table: DataTable::client_computed(
                admin_user_table_columns(),
                USERS_PAGE_SIZE,
                Some("name"),
            ),
        }
    }

    pub fn test(base_url: String) -> Self {
        Self::with_config(AppConfig::new(base_url))
    }

    /// Test state that already holds a signed-in session, skipping the
    /// login round-trip.
    pub fn test_signed_in(base_url: String, user: AuthUser) -> Self {
        let mut state = Self::with_config(AppConfig::new(base_url));
        state.store.set(Session {
            access_token: "test-access-token".to_string(),
            refresh_token: "test-refresh-token".to_string(),
            user: user.clone(),
        });
        state.ctx.record_compute(AuthCompute::signed_in(user));
        state
    }
}
