//! Tests for the profile page.
//!
//! The page fetches the account on first open and saves changes through
//! `PUT /users/me`; a landed save surfaces the success banner.

use kittest::Queryable;
use taskdeck_business::Role;
use taskdeck_ui::state::State;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::TestCtx;

mod common;

fn profile_json() -> serde_json::Value {
    serde_json::json!({
        "id": 7,
        "email": "tester@taskdeck.dev",
        "name": "Test User",
        "role": "USER",
        "createdAt": "2026-01-05T08:00:00",
        "updatedAt": "2026-08-20T09:30:00",
    })
}

async fn setup_profile_mocks(mock_server: &MockServer) {
    common::mount_task_page(mock_server, common::page_json(&[], 0, 10, 0)).await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(1)
        .mount(mock_server)
        .await;
}

/// Tests that opening the profile page fetches and renders the account.
#[tokio::test]
async fn test_profile_page_loads_account() {
    let mock_server = common::start_server().await;
    setup_profile_mocks(&mock_server).await;

    let state = State::test_signed_in(mock_server.uri(), common::test_user(Role::User));
    let mut ctx = TestCtx::from_state(mock_server, state);

    let harness = ctx.harness_mut();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();

    harness.get_by_label("Profile").click();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();

    assert!(
        harness.query_by_label("tester@taskdeck.dev").is_some(),
        "The account email should render"
    );
    assert!(
        harness.query_by_label("Member since:").is_some(),
        "The identity grid should render"
    );
    assert!(
        harness.query_by_label("Change password").is_some(),
        "The password section should render"
    );
}

/// Tests that saving the profile shows the success banner.
#[tokio::test]
async fn test_profile_save_shows_banner() {
    let mock_server = common::start_server().await;
    setup_profile_mocks(&mock_server).await;
    Mock::given(method("PUT"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = State::test_signed_in(mock_server.uri(), common::test_user(Role::User));
    let mut ctx = TestCtx::from_state(mock_server, state);

    let harness = ctx.harness_mut();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();

    harness.get_by_label("Profile").click();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();

    harness.get_by_label("Save").click();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();

    assert!(
        harness.query_by_label("Profile updated").is_some(),
        "A landed save should show the success banner"
    );
}
