//! Tests for the task delete confirmation.
//!
//! Deleting goes through a confirm window; only the confirm click fires
//! the request, and a landed delete refreshes the list.

use kittest::Queryable;
use taskdeck_business::Role;
use taskdeck_business::tasks::TaskActionInput;
use taskdeck_ui::state::State;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::TestCtx;

mod common;

#[tokio::test]
async fn test_confirmed_delete_fires_request_and_refreshes() {
    let mock_server = common::start_server().await;
    // Fetched once on open and once more after the delete lands.
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_json(&[], 0, 10, 0)))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut state = State::test_signed_in(mock_server.uri(), common::test_user(Role::User));
    state
        .ctx
        .update::<TaskActionInput>(|input| input.pending_delete = Some(1));
    let mut ctx = TestCtx::from_state(mock_server, state);

    let harness = ctx.harness_mut();
    harness.step();

    assert!(
        harness
            .query_by_label("Delete task #1? This cannot be undone.")
            .is_some(),
        "The confirm window should be up"
    );

    harness.get_by_label("Delete").click();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();

    assert!(
        harness
            .query_by_label("Delete task #1? This cannot be undone.")
            .is_none(),
        "A landed delete should close the confirm window"
    );
}

/// Tests that cancel closes the window without touching the server.
#[tokio::test]
async fn test_cancelled_delete_sends_nothing() {
    let mock_server = common::start_server().await;
    common::mount_task_page(&mock_server, common::page_json(&[], 0, 10, 0)).await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut state = State::test_signed_in(mock_server.uri(), common::test_user(Role::User));
    state
        .ctx
        .update::<TaskActionInput>(|input| input.pending_delete = Some(1));
    let mut ctx = TestCtx::from_state(mock_server, state);

    let harness = ctx.harness_mut();
    harness.step();

    harness.get_by_label("Cancel").click();
    harness.step();
    harness.step();

    assert!(
        harness
            .query_by_label("Delete task #1? This cannot be undone.")
            .is_none(),
        "Cancel should close the confirm window"
    );
    // The expectation of zero delete calls is verified when the server drops.
}
