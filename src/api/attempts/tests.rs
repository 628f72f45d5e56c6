
use axum::body::Body;
use axum::http::{Method, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

const ATTEMPTS_PREFIX: &str = "/api/v1/attempts/";

/// Starts (or resumes) the exam and returns the attempt id from the redirect.
async fn start(app: Router, exam_id: &str, token: &str) -> String {
    let response = app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/exams/{exam_id}/start"),
            Some(token),
            None,
        ))
        .await
        .expect("start attempt");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    attempt_id_from(&test_support::location(&response))
}

fn attempt_id_from(location: &str) -> String {
    location
        .strip_prefix(ATTEMPTS_PREFIX)
        .map(|rest| rest.trim_end_matches("/result").to_string())
        .unwrap_or_else(|| panic!("unexpected location {location}"))
}

async fn save(app: Router, attempt_id: &str, token: &str, answers: serde_json::Value) -> Response<Body> {
    app.oneshot(test_support::json_request(
        Method::POST,
        &format!("{ATTEMPTS_PREFIX}{attempt_id}"),
        Some(token),
        Some(json!({ "answers": answers })),
    ))
    .await
    .expect("save answers")
}

async fn submit(app: Router, attempt_id: &str, token: &str) -> Response<Body> {
    app.oneshot(test_support::json_request(
        Method::POST,
        &format!("{ATTEMPTS_PREFIX}{attempt_id}/submit"),
        Some(token),
        None,
    ))
    .await
    .expect("submit attempt")
}

async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(test_support::json_request(Method::GET, uri, Some(token), None))
        .await
        .expect("get")
}

#[test]
fn attempt_id_is_read_from_take_and_result_locations() {
    assert_eq!(attempt_id_from("/api/v1/attempts/abc"), "abc");
    assert_eq!(attempt_id_from("/api/v1/attempts/abc/result"), "abc");
}
