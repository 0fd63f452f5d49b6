//! Tests for the admin user directory.
//!
//! The directory is fetched once in full and then paged locally: flipping
//! pages must never hit the server again. The mock expectation of exactly
//! one directory call backs that up.

use kittest::Queryable;
use taskdeck_business::Role;
use taskdeck_ui::state::State;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::TestCtx;

mod common;

#[tokio::test]
async fn test_user_directory_pages_locally() {
    let mock_server = common::start_server().await;
    common::mount_task_page(&mock_server, common::page_json(&[], 0, 10, 0)).await;

    let directory: Vec<_> = (1..=12)
        .map(|id| {
            common::admin_user_json(
                id,
                &format!("User {id:02}"),
                &format!("user-{id:02}@taskdeck.dev"),
            )
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::page_json(&directory, 0, 200, 12)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = State::test_signed_in(mock_server.uri(), common::test_user(Role::Admin));
    let mut ctx = TestCtx::from_state(mock_server, state);

    let harness = ctx.harness_mut();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();

    // The admin links only render for admin users.
    harness.get_by_label("Users").click();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();

    assert!(
        harness.query_by_label("User 01").is_some(),
        "The first directory page should render"
    );
    assert!(
        harness.query_by_label("12 total, showing 1-10").is_some(),
        "The footer should count the whole directory"
    );
    assert!(
        harness.query_by_label("Search:").is_some(),
        "The directory table filters locally, so it gets a search box"
    );

    harness.get_by_label("▶").click();
    harness.step();
    harness.step();

    assert!(
        harness.query_by_label("User 11").is_some(),
        "The second page should appear without another fetch"
    );
    assert!(
        harness.query_by_label("User 01").is_none(),
        "First-page rows should be gone after flipping"
    );
    assert!(
        harness.query_by_label("12 total, showing 11-12").is_some(),
        "The footer should move to the new window"
    );
    // Exactly one directory call is verified when the mock server drops.
}

/// Tests that non-admin users never see the admin navigation.
#[tokio::test]
async fn test_admin_links_hidden_for_regular_users() {
    let mut ctx = TestCtx::new_app_signed_in(common::test_user(Role::User)).await;

    let harness = ctx.harness_mut();
    harness.step();

    assert!(
        harness.query_by_label("Users").is_none(),
        "Regular users should not see the directory link"
    );
    assert!(
        harness.query_by_label("Dashboard").is_none(),
        "Regular users should not see the dashboard link"
    );
    assert!(
        harness.query_by_label("New Task").is_some(),
        "The tasks page itself should still be reachable"
    );
}
