//! Tests for the task creation form.
//!
//! A landed create returns to the task list, which then refetches and
//! shows the new row.

use kittest::Queryable;
use taskdeck_business::tasks::TaskEditorInput;
use taskdeck_business::{Role, Route};
use taskdeck_ui::state::State;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::TestCtx;

mod common;

#[tokio::test]
async fn test_create_task_returns_to_list() {
    let mock_server = common::start_server().await;

    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(common::task_json(99, "Ship the quarterly summary")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    // The list is only fetched after the form hands control back.
    common::mount_task_page(
        &mock_server,
        common::page_json(
            &[common::task_json(99, "Ship the quarterly summary")],
            0,
            10,
            1,
        ),
    )
    .await;

    let mut state = State::test_signed_in(mock_server.uri(), common::test_user(Role::User));
    state.ctx.update::<Route>(|route| *route = Route::TaskNew);
    state.ctx.update::<TaskEditorInput>(|input| {
        input.title = "Ship the quarterly summary".to_string();
    });
    let mut ctx = TestCtx::from_state(mock_server, state);

    let harness = ctx.harness_mut();
    harness.step();

    assert!(
        harness.query_by_label("Create").is_some(),
        "The create form should be up"
    );

    harness.get_by_label("Create").click();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();

    assert!(
        harness.query_by_label("New Task").is_some(),
        "A landed create should return to the task list"
    );
    assert!(
        harness
            .query_by_label("Ship the quarterly summary")
            .is_some(),
        "The refreshed list should contain the new task"
    );
}

/// Tests that cancelling the form goes back without saving.
#[tokio::test]
async fn test_cancel_returns_without_saving() {
    let mock_server = common::start_server().await;
    common::mount_task_page(&mock_server, common::page_json(&[], 0, 10, 0)).await;

    let mut state = State::test_signed_in(mock_server.uri(), common::test_user(Role::User));
    state.ctx.update::<Route>(|route| *route = Route::TaskNew);
    let mut ctx = TestCtx::from_state(mock_server, state);

    let harness = ctx.harness_mut();
    harness.step();

    harness.get_by_label("Cancel").click();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();

    assert!(
        harness.query_by_label("New Task").is_some(),
        "Cancel should land back on the task list"
    );
    // No POST /api/tasks mock is mounted; a save attempt would have the
    // command report a network error instead of navigating.
}
