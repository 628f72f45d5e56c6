use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentStaff, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::Course;
use crate::repositories;
use crate::schemas::course::{
    CourseCreate, CourseEnrollmentResponse, CourseResponse, CourseUpdate, EnrollmentResponse,
};

pub(super) async fn list_courses(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

pub(super) async fn create_course(
    CurrentStaff(staff): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            name: &payload.name,
            grade: payload.grade,
            created_by: &staff.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create course"))?;

    tracing::info!(course_id = %course.id, created_by = %staff.id, "Course created");

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

pub(super) async fn get_course(
    Path(course_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = fetch_course(&state, &course_id).await?;
    Ok(Json(CourseResponse::from_db(course)))
}

pub(super) async fn update_course(
    Path(course_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = repositories::courses::update(
        state.db(),
        &course_id,
        repositories::courses::UpdateCourse {
            name: payload.name,
            grade: payload.grade,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update course"))?
    .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    Ok(Json(CourseResponse::from_db(course)))
}

pub(super) async fn delete_course(
    Path(course_id): Path<String>,
    CurrentStaff(staff): CurrentStaff,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::courses::delete(state.db(), &course_id).await.map_err(|e| {
        ApiError::from_write(e, "Course is still referenced", "Failed to delete course")
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    tracing::info!(course_id = %course_id, deleted_by = %staff.id, "Course deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn list_enrolled_courses(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::enrollments::list_courses_for_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrolled courses"))?;

    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

pub(super) async fn enroll(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    fetch_course(&state, &course_id).await?;

    let enrollment = repositories::enrollments::ensure(
        state.db(),
        &Uuid::new_v4().to_string(),
        &user.id,
        &course_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to enroll"))?;

    tracing::info!(course_id = %course_id, user_id = %user.id, "User enrolled");

    Ok((
        StatusCode::CREATED,
        Json(EnrollmentResponse {
            id: enrollment.id,
            user_id: enrollment.user_id,
            course_id: enrollment.course_id,
            enrolled_at: format_primitive(enrollment.enrolled_at),
        }),
    ))
}

pub(super) async fn unenroll(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let removed = repositories::enrollments::delete(state.db(), &user.id, &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to unenroll"))?;

    if !removed {
        return Err(ApiError::NotFound("Enrollment not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn list_course_enrollments(
    Path(course_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseEnrollmentResponse>>, ApiError> {
    fetch_course(&state, &course_id).await?;

    let rows = repositories::enrollments::list_for_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollments"))?;

    Ok(Json(
        rows.into_iter()
            .map(|row| CourseEnrollmentResponse {
                id: row.id,
                user_id: row.user_id,
                username: row.username,
                full_name: row.full_name,
                enrolled_at: format_primitive(row.enrolled_at),
            })
            .collect(),
    ))
}

pub(super) async fn fetch_course(state: &AppState, course_id: &str) -> Result<Course, ApiError> {
    repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))
}
