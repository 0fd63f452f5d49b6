//! Tests for server-driven task paging.
//!
//! A pagination click on the tasks table never slices rows locally; it
//! widens into a new query and the next page comes from the server.

use kittest::Queryable;
use taskdeck_business::Role;
use taskdeck_ui::state::State;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::TestCtx;

mod common;

/// Tests that clicking "next page" refetches instead of slicing locally.
#[tokio::test]
async fn test_next_page_click_fetches_second_page() {
    let mock_server = common::start_server().await;

    let first_page: Vec<_> = (1..=10)
        .map(|id| common::task_json(id, &format!("Task {id:02}")))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("page", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::page_json(&first_page, 0, 10, 12)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let second_page = vec![
        common::task_json(11, "Task 11"),
        common::task_json(12, "Task 12"),
    ];
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::page_json(&second_page, 1, 10, 12)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = State::test_signed_in(mock_server.uri(), common::test_user(Role::User));
    let mut ctx = TestCtx::from_state(mock_server, state);

    let harness = ctx.harness_mut();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();

    assert!(
        harness.query_by_label("Task 01").is_some(),
        "The first page should render initially"
    );
    assert!(
        harness.query_by_label("12 total, showing 1-10").is_some(),
        "The footer should report the first window"
    );

    harness.get_by_label("▶").click();
    harness.step();
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();

    assert!(
        harness.query_by_label("Task 11").is_some(),
        "The second page should come from the server"
    );
    assert!(
        harness.query_by_label("Task 01").is_none(),
        "First-page rows should be gone after navigating"
    );
    assert!(
        harness.query_by_label("12 total, showing 11-12").is_some(),
        "The footer should report the new window"
    );
}
