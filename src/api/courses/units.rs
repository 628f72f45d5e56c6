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
use crate::core::time::primitive_now_utc;
use crate::db::models::Unit;
use crate::repositories;
use crate::schemas::course::{
    LessonCreate, LessonResponse, LessonUpdate, UnitCreate, UnitResponse, UnitUpdate,
};

use super::handlers::fetch_course;

pub(super) async fn list_units(
    Path(course_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UnitResponse>>, ApiError> {
    fetch_course(&state, &course_id).await?;

    let units = repositories::units::list_by_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list units"))?;

    Ok(Json(units.into_iter().map(UnitResponse::from_db).collect()))
}

pub(super) async fn create_unit(
    Path(course_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<UnitCreate>,
) -> Result<(StatusCode, Json<UnitResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    fetch_course(&state, &course_id).await?;

    let unit = repositories::units::create(
        state.db(),
        repositories::units::CreateUnit {
            id: &Uuid::new_v4().to_string(),
            course_id: &course_id,
            title: &payload.title,
            position: payload.position,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Course no longer exists", "Failed to create unit"))?;

    Ok((StatusCode::CREATED, Json(UnitResponse::from_db(unit))))
}

pub(super) async fn get_unit(
    Path(unit_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<UnitResponse>, ApiError> {
    Ok(Json(UnitResponse::from_db(fetch_unit(&state, &unit_id).await?)))
}

pub(super) async fn update_unit(
    Path(unit_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<UnitUpdate>,
) -> Result<Json<UnitResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let unit = repositories::units::update(
        state.db(),
        &unit_id,
        payload.title,
        payload.position,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update unit"))?
    .ok_or_else(|| ApiError::NotFound("Unit not found".to_string()))?;

    Ok(Json(UnitResponse::from_db(unit)))
}

pub(super) async fn delete_unit(
    Path(unit_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::units::delete(state.db(), &unit_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete unit"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Unit not found".to_string()))
    }
}

pub(super) async fn list_lessons(
    Path(unit_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<LessonResponse>>, ApiError> {
    fetch_unit(&state, &unit_id).await?;

    let lessons = repositories::lessons::list_by_unit(state.db(), &unit_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list lessons"))?;

    Ok(Json(lessons.into_iter().map(LessonResponse::from_db).collect()))
}

pub(super) async fn create_lesson(
    Path(unit_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<LessonCreate>,
) -> Result<(StatusCode, Json<LessonResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    fetch_unit(&state, &unit_id).await?;

    let lesson = repositories::lessons::create(
        state.db(),
        repositories::lessons::CreateLesson {
            id: &Uuid::new_v4().to_string(),
            unit_id: &unit_id,
            title: &payload.title,
            position: payload.position,
            content: &payload.content,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Unit no longer exists", "Failed to create lesson"))?;

    Ok((StatusCode::CREATED, Json(LessonResponse::from_db(lesson))))
}

pub(super) async fn get_lesson(
    Path(lesson_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<LessonResponse>, ApiError> {
    let lesson = repositories::lessons::find_by_id(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch lesson"))?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    Ok(Json(LessonResponse::from_db(lesson)))
}

pub(super) async fn update_lesson(
    Path(lesson_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<LessonUpdate>,
) -> Result<Json<LessonResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let lesson = repositories::lessons::update(
        state.db(),
        &lesson_id,
        repositories::lessons::UpdateLesson {
            title: payload.title,
            position: payload.position,
            content: payload.content,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update lesson"))?
    .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    Ok(Json(LessonResponse::from_db(lesson)))
}

pub(super) async fn delete_lesson(
    Path(lesson_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::lessons::delete(state.db(), &lesson_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete lesson"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Lesson not found".to_string()))
    }
}

async fn fetch_unit(state: &AppState, unit_id: &str) -> Result<Unit, ApiError> {
    repositories::units::find_by_id(state.db(), unit_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch unit"))?
        .ok_or_else(|| ApiError::NotFound("Unit not found".to_string()))
}
