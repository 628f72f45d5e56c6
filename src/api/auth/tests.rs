use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn signup_login_and_me_round_trip() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "username": "new.student",
                "fullName": "New Student",
                "password": "student-pass"
            })),
        ))
        .await
        .expect("signup");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["user"]["role"], "student");
    assert_eq!(created["token_type"], "bearer");
    assert_eq!(created["expires_in"], 10_080 * 60);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "new.student", "password": "student-pass"})),
        ))
        .await
        .expect("login");

    let status = response.status();
    let login = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {login}");
    let token = login["access_token"].as_str().expect("token").to_string();

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/auth/me", Some(&token), None))
        .await
        .expect("me");

    let status = response.status();
    let me = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {me}");
    assert_eq!(me["username"], "new.student");
    assert_eq!(me["full_name"], "New Student");
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_student(ctx.state.db(), "taken").await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({"username": "taken", "full_name": "Someone", "password": "long-enough"})),
        ))
        .await
        .expect("signup");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_student(ctx.state.db(), "pupil02").await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "pupil02", "password": "wrong-pass"})),
        ))
        .await
        .expect("login");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/auth/me", None, None))
        .await
        .expect("me");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
