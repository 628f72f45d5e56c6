use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::repositories;
use crate::test_support;

#[tokio::test]
async fn staff_builds_course_with_ordered_units_and_lessons() {
    let ctx = test_support::setup_test_context().await;

    let staff = test_support::insert_staff(ctx.state.db(), "teacher01").await;
    let token = test_support::bearer_token(&staff.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(&token),
            Some(json!({"name": "Physics", "grade": 9})),
        ))
        .await
        .expect("create course");

    let status = response.status();
    let course = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {course}");
    let course_id = course["id"].as_str().expect("course id").to_string();
    assert_eq!(course["created_by"], staff.id.as_str());

    for (title, order) in [("Waves", 2), ("Motion", 1)] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/courses/{course_id}/units"),
                Some(&token),
                Some(json!({"title": title, "order": order})),
            ))
            .await
            .expect("create unit");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/courses/{course_id}/units"),
            Some(&token),
            None,
        ))
        .await
        .expect("list units");

    let units = test_support::read_json(response).await;
    let titles: Vec<&str> =
        units.as_array().expect("units").iter().filter_map(|u| u["title"].as_str()).collect();
    assert_eq!(titles, vec!["Motion", "Waves"]);
    let unit_id = units[0]["id"].as_str().expect("unit id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/units/{unit_id}/lessons"),
            Some(&token),
            Some(json!({"title": "Speed", "position": 0, "content": "<p>v = s / t</p>"})),
        ))
        .await
        .expect("create lesson");

    let status = response.status();
    let lesson = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {lesson}");
    assert_eq!(lesson["content"], "<p>v = s / t</p>");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/units/{unit_id}/lessons"),
            Some(&token),
            None,
        ))
        .await
        .expect("list lessons");

    let lessons = test_support::read_json(response).await;
    assert_eq!(lessons.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn student_cannot_create_course() {
    let ctx = test_support::setup_test_context().await;

    let student = test_support::insert_student(ctx.state.db(), "pupil10").await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(&token),
            Some(json!({"name": "Chemistry", "grade": 8})),
        ))
        .await
        .expect("create course");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_grade_is_rejected() {
    let ctx = test_support::setup_test_context().await;

    let staff = test_support::insert_staff(ctx.state.db(), "teacher02").await;
    let token = test_support::bearer_token(&staff.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(&token),
            Some(json!({"name": "History", "grade": 0})),
        ))
        .await
        .expect("create course");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unit_under_missing_course_is_not_found() {
    let ctx = test_support::setup_test_context().await;

    let staff = test_support::insert_staff(ctx.state.db(), "teacher03").await;
    let token = test_support::bearer_token(&staff.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses/missing/units",
            Some(&token),
            Some(json!({"title": "Orphan"})),
        ))
        .await
        .expect("create unit");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn enrollment_is_idempotent_and_listed() {
    let ctx = test_support::setup_test_context().await;

    let staff = test_support::insert_staff(ctx.state.db(), "teacher04").await;
    let student = test_support::insert_student(ctx.state.db(), "pupil11").await;
    let course = test_support::insert_course(ctx.state.db(), "Biology", 6, &staff.id).await;
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());
    let staff_token = test_support::bearer_token(&staff.id, ctx.state.settings());

    for _ in 0..2 {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/courses/{}/enroll", course.id),
                Some(&student_token),
                None,
            ))
            .await
            .expect("enroll");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/courses/enrolled",
            Some(&student_token),
            None,
        ))
        .await
        .expect("enrolled courses");
    let enrolled = test_support::read_json(response).await;
    assert_eq!(enrolled.as_array().map(Vec::len), Some(1));
    assert_eq!(enrolled[0]["name"], "Biology");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/courses/{}/enrollments", course.id),
            Some(&staff_token),
            None,
        ))
        .await
        .expect("course enrollments");
    let roster = test_support::read_json(response).await;
    assert_eq!(roster.as_array().map(Vec::len), Some(1));
    assert_eq!(roster[0]["username"], "pupil11");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/courses/{}/enroll", course.id),
            Some(&student_token),
            None,
        ))
        .await
        .expect("unenroll");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let remaining = repositories::enrollments::list_for_course(ctx.state.db(), &course.id)
        .await
        .expect("list enrollments");
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn deleting_course_cascades_to_units() {
    let ctx = test_support::setup_test_context().await;

    let staff = test_support::insert_staff(ctx.state.db(), "teacher05").await;
    let course = test_support::insert_course(ctx.state.db(), "Art", 5, &staff.id).await;
    let token = test_support::bearer_token(&staff.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/courses/{}/units", course.id),
            Some(&token),
            Some(json!({"title": "Colour"})),
        ))
        .await
        .expect("create unit");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/courses/{}", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("delete course");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let units = repositories::units::list_by_course(ctx.state.db(), &course.id)
        .await
        .expect("list units");
    assert!(units.is_empty());
}
