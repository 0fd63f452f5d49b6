use egui_kittest::Harness;
use taskdeck_business::{AuthUser, Role};
use taskdeck_ui::TaskdeckApp;
use taskdeck_ui::state::State;
use wiremock::Mock;
use wiremock::matchers::{method, path};
use wiremock::{MockServer, ResponseTemplate};

pub struct TestCtx<'a, T = State> {
    _mock_server: MockServer,
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, T> {
        &self.harness
    }
}

impl<'a> TestCtx<'a, State> {
    /// Harness over a single page closure instead of the whole app shell.
    #[allow(unused)]
    pub async fn new(app: impl FnMut(&mut egui::Ui, &mut State) + 'a) -> Self {
        let mock_server = start_server().await;
        let state = State::test(mock_server.uri());
        let harness = Harness::new_ui_state(app, state);

        Self {
            _mock_server: mock_server,
            harness,
        }
    }
}

impl<'a> TestCtx<'a, TaskdeckApp> {
    /// Full app with nobody signed in; the first frame shows the login page.
    #[allow(unused)]
    pub async fn new_app() -> Self {
        let mock_server = start_server().await;
        let state = State::test(mock_server.uri());
        Self::from_state(mock_server, state)
    }

    /// Full app over a state the test prepared itself.
    ///
    /// Mount every mock before calling this: the first frame may already
    /// fire requests (a signed-in app fetches the task list immediately).
    #[allow(unused)]
    pub fn from_state(mock_server: MockServer, state: State) -> Self {
        let app = TaskdeckApp::with_state(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            _mock_server: mock_server,
            harness,
        }
    }

    /// Full app with a session already in place, landing on the tasks page.
    ///
    /// The task list endpoint answers with an empty page; tests that care
    /// about task rows should mount their own mock via [`from_state`].
    #[allow(unused)]
    pub async fn new_app_signed_in(user: AuthUser) -> Self {
        let mock_server = start_server().await;
        mount_task_page(&mock_server, page_json(&[], 0, 10, 0)).await;
        let state = State::test_signed_in(mock_server.uri(), user);
        Self::from_state(mock_server, state)
    }
}

/// Starts the mock backend and initializes test logging.
pub async fn start_server() -> MockServer {
    let _ = env_logger::builder().is_test(true).try_init();
    MockServer::start().await
}

#[allow(unused)]
pub fn test_user(role: Role) -> AuthUser {
    AuthUser {
        id: 7,
        email: "tester@taskdeck.dev".to_string(),
        name: "Test User".to_string(),
        role,
    }
}

/// Wire-shaped body for the login and signup endpoints.
#[allow(unused)]
pub fn auth_response_json(user: &AuthUser) -> serde_json::Value {
    serde_json::json!({
        "accessToken": "test-access-token",
        "refreshToken": "test-refresh-token",
        "tokenType": "Bearer",
        "expiresIn": 900_000,
        "user": serde_json::to_value(user).expect("AuthUser serializes"),
    })
}

/// One wire-shaped task row.
#[allow(unused)]
pub fn task_json(id: i64, title: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": null,
        "status": "TODO",
        "priority": "MEDIUM",
        "userId": 7,
        "userName": "Test User",
        "createdAt": "2026-08-20T09:30:00",
        "updatedAt": "2026-08-20T09:30:00",
    })
}

/// One wire-shaped user directory row.
#[allow(unused)]
pub fn admin_user_json(id: i64, name: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "email": email,
        "name": name,
        "role": "USER",
        "status": "ACTIVE",
        "createdAt": "2026-08-18T12:00:00",
        "updatedAt": "2026-08-18T12:00:00",
    })
}

/// Wire-shaped page envelope around the given rows.
#[allow(unused)]
pub fn page_json(
    content: &[serde_json::Value],
    page: u64,
    size: u64,
    total_elements: u64,
) -> serde_json::Value {
    let total_pages = if size == 0 {
        0
    } else {
        total_elements.div_ceil(size)
    };
    serde_json::json!({
        "content": content,
        "page": page,
        "size": size,
        "totalElements": total_elements,
        "totalPages": total_pages,
        "first": page == 0,
        "last": page + 1 >= total_pages.max(1),
    })
}

/// Mounts a 200 answer for the task list endpoint.
#[allow(unused)]
pub async fn mount_task_page(mock_server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}
