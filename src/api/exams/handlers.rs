use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentStaff, CurrentUser};
use crate::api::pagination::{PaginatedResponse, Window};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::exam::{ExamCreate, ExamListQuery, ExamResponse, ExamUpdate};

use super::helpers;

pub(super) async fn list_exams(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<ExamListQuery>,
) -> Result<Json<PaginatedResponse<ExamResponse>>, ApiError> {
    let window = Window::clamp(params.skip, params.limit);
    let course_id = params.course_id.as_deref();

    let exams = repositories::exams::list(state.db(), course_id, window.skip, window.limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list exams"))?;
    let total_count = repositories::exams::count(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count exams"))?;

    Ok(Json(PaginatedResponse::new(
        exams.into_iter().map(ExamResponse::from_db).collect(),
        total_count,
        window,
    )))
}

pub(super) async fn create_exam(
    CurrentStaff(staff): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<ExamCreate>,
) -> Result<(StatusCode, Json<ExamResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    repositories::courses::find_by_id(state.db(), &payload.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let exam = repositories::exams::create(
        state.db(),
        repositories::exams::CreateExam {
            id: &Uuid::new_v4().to_string(),
            course_id: &payload.course_id,
            title: &payload.title,
            total_marks: payload.total_marks,
            created_by: &staff.id,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Course no longer exists", "Failed to create exam"))?;

    tracing::info!(exam_id = %exam.id, course_id = %exam.course_id, "Exam created");

    Ok((StatusCode::CREATED, Json(ExamResponse::from_db(exam))))
}

pub(super) async fn get_exam(
    Path(exam_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ExamResponse>, ApiError> {
    let exam = helpers::fetch_exam(&state, &exam_id).await?;
    let totals = repositories::exams::totals(state.db(), &exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to compute exam totals"))?;

    Ok(Json(ExamResponse::from_db(exam).with_totals(totals)))
}

pub(super) async fn update_exam(
    Path(exam_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<ExamUpdate>,
) -> Result<Json<ExamResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let exam = repositories::exams::update(
        state.db(),
        &exam_id,
        repositories::exams::UpdateExam {
            title: payload.title,
            total_marks: payload.total_marks,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update exam"))?
    .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))?;

    Ok(Json(ExamResponse::from_db(exam)))
}

pub(super) async fn delete_exam(
    Path(exam_id): Path<String>,
    CurrentStaff(staff): CurrentStaff,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::exams::delete_by_id(state.db(), &exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete exam"))?;

    if !deleted {
        return Err(ApiError::NotFound("Exam not found".to_string()));
    }

    tracing::info!(exam_id = %exam_id, deleted_by = %staff.id, "Exam deleted");
    Ok(StatusCode::NO_CONTENT)
}
