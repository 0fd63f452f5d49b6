use taskdeck_business::admin::{
    AdminActionCompute, AdminActionInput, AdminDashboardCompute, AdminUserEditCompute,
    AdminUserEditInput, AdminUsersCompute,
};
use taskdeck_business::auth::{AuthCompute, CredentialsInput};
use taskdeck_business::profile::{ProfileActionCompute, ProfileCompute, ProfileInput};
use taskdeck_business::tasks::{
    TaskActionCompute, TaskActionInput, TaskEditorCompute, TaskEditorInput, TaskListCompute,
    TaskListQuery,
};
use taskdeck_business::{
    AuthUser, Route, STORAGE_KEY_ACCESS_TOKEN, STORAGE_KEY_REFRESH_TOKEN, STORAGE_KEY_USER,
    Session, SessionEvent, SessionStore,
};

use crate::{pages, state::State, widgets};

pub struct TaskdeckApp {
    state: State,
}

impl TaskdeckApp {
    /// Called once before the first frame. Wires the repaint waker and
    /// restores a persisted session, if one is stored.
    pub fn new(cc: &eframe::CreationContext<'_>, state: State) -> Self {
        let mut app = Self::with_state(state);

        // Repaint whenever a background command publishes a result.
        let egui_ctx = cc.egui_ctx.clone();
        app.state.ctx.set_waker(move || egui_ctx.request_repaint());

        if let Some(storage) = cc.storage
            && let Some(session) = load_stored_session(storage)
        {
            log::info!("Restoring persisted session for {}", session.user.email);
            let user = session.user.clone();
            app.state.store.set(session);
            app.state.ctx.record_compute(AuthCompute::signed_in(user));
            app.state.ctx.update::<Route>(|route| *route = Route::Tasks);
        }

        app
    }

    /// Bare constructor for tests; `new` additionally wires the waker and
    /// the storage restore.
    pub fn with_state(state: State) -> Self {
        Self { state }
    }

    /// Commands clear the session store on sign-out and on failed token
    /// renewal; this folds those store events back into the UI state so
    /// every page forgets the old user.
    fn handle_session_events(&mut self) {
        let mut cleared = false;
        while let Ok(event) = self.state.session_events.try_recv() {
            if event == SessionEvent::Cleared {
                cleared = true;
            }
        }
        if !cleared {
            return;
        }

        log::info!("Session cleared, returning to the login page");
        let updater = self.state.ctx.updater();
        updater.set(AuthCompute::default());
        updater.set(TaskListCompute::reset());
        updater.set(TaskEditorCompute::default());
        updater.set(TaskActionCompute::default());
        updater.set(ProfileCompute::default());
        updater.set(ProfileActionCompute::default());
        updater.set(AdminDashboardCompute::default());
        updater.set(AdminUsersCompute::reset());
        updater.set(AdminUserEditCompute::default());
        updater.set(AdminActionCompute::default());
        self.state.ctx.sync_computes();

        self.state
            .ctx
            .update::<CredentialsInput>(|input| *input = CredentialsInput::default());
        self.state
            .ctx
            .update::<TaskListQuery>(|query| *query = TaskListQuery::default());
        self.state
            .ctx
            .update::<TaskEditorInput>(|input| *input = TaskEditorInput::default());
        self.state
            .ctx
            .update::<TaskActionInput>(|input| *input = TaskActionInput::default());
        self.state.ctx.update::<ProfileInput>(|input| input.reset());
        self.state
            .ctx
            .update::<AdminUserEditInput>(|input| *input = AdminUserEditInput::default());
        self.state
            .ctx
            .update::<AdminActionInput>(|input| *input = AdminActionInput::default());
        self.state.ctx.update::<Route>(|route| *route = Route::Login);
    }

    /// Three rules: anonymous users only see the login page, signed-in
    /// users never see it, and non-admins stay off the admin pages.
    fn enforce_route_access(&mut self) {
        let (authenticated, admin) = self
            .state
            .ctx
            .cached::<AuthCompute>()
            .map(|compute| (compute.is_authenticated(), compute.is_admin()))
            .unwrap_or((false, false));
        let route = self.state.ctx.state::<Route>().clone();

        let target = if !authenticated && route.requires_auth() {
            Some(Route::Login)
        } else if authenticated && route == Route::Login {
            Some(Route::Tasks)
        } else if !admin && route.requires_admin() {
            Some(Route::Tasks)
        } else {
            None
        };
        if let Some(target) = target {
            self.state.ctx.update::<Route>(|route| *route = target);
        }
    }
}

impl eframe::App for TaskdeckApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Sync Compute for render
        self.state.ctx.sync_computes();

        self.handle_session_events();
        self.enforce_route_access();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                widgets::nav_bar(&mut self.state.ctx, ui);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    widgets::env_version(ui);
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let route = self.state.ctx.state::<Route>().clone();
            match route {
                Route::Login => pages::login_page(&mut self.state, ui),
                Route::Tasks => pages::tasks_page(&mut self.state, ui),
                Route::TaskNew | Route::TaskEdit(_) => {
                    pages::task_form_page(&mut self.state, ui)
                }
                Route::Profile => pages::profile_page(&mut self.state, ui),
                Route::Admin => pages::admin_dashboard_page(&mut self.state, ui),
                Route::AdminUsers => pages::admin_users_page(&mut self.state, ui),
                Route::AdminUserEdit(id) => {
                    pages::admin_user_edit_page(&mut self.state, ui, id)
                }
            };
        });

        // Run queued commands and background jobs
        self.state.ctx.flush_commands();
        self.state.ctx.run_computed();
    }

    /// All three keys are written every time so a cleared session also
    /// clears the persisted copy.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let session = self.state.store.get();
        storage.set_string(
            STORAGE_KEY_ACCESS_TOKEN,
            session
                .as_ref()
                .map(|session| session.access_token.clone())
                .unwrap_or_default(),
        );
        storage.set_string(
            STORAGE_KEY_REFRESH_TOKEN,
            session
                .as_ref()
                .map(|session| session.refresh_token.clone())
                .unwrap_or_default(),
        );
        let user_json = session
            .as_ref()
            .and_then(|session| serde_json::to_string(&session.user).ok())
            .unwrap_or_default();
        storage.set_string(STORAGE_KEY_USER, user_json);
    }
}

/// A session survives restarts only when all three persisted keys hold
/// usable values; a corrupt user record drops the whole session and gets
/// overwritten on the next save.
fn load_stored_session(storage: &dyn eframe::Storage) -> Option<Session> {
    let access_token = storage
        .get_string(STORAGE_KEY_ACCESS_TOKEN)
        .filter(|value| !value.is_empty())?;
    let refresh_token = storage
        .get_string(STORAGE_KEY_REFRESH_TOKEN)
        .filter(|value| !value.is_empty())?;
    let user_json = storage
        .get_string(STORAGE_KEY_USER)
        .filter(|value| !value.is_empty())?;

    match serde_json::from_str::<AuthUser>(&user_json) {
        Ok(user) => Some(Session {
            access_token,
            refresh_token,
            user,
        }),
        Err(e) => {
            log::warn!("Ignoring persisted session, stored user is unreadable: {e}");
            None
        }
    }
}
