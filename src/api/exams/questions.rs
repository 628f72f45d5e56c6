use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStaff;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::exam::{
    ChoiceCreate, ChoiceResponse, ChoiceUpdate, QuestionCreate, QuestionResponse, QuestionUpdate,
};

use super::helpers;

pub(super) async fn list_questions(
    Path(exam_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuestionResponse>>, ApiError> {
    helpers::fetch_exam(&state, &exam_id).await?;

    let questions = repositories::questions::list_by_exam(state.db(), &exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;
    let choices = repositories::choices::list_by_exam(state.db(), &exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list choices"))?;

    Ok(Json(helpers::questions_with_choices(questions, choices)))
}

pub(super) async fn create_question(
    Path(exam_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<QuestionCreate>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if payload.choices.iter().filter(|choice| choice.is_correct).count() > 1 {
        return Err(ApiError::BadRequest("At most one choice can be correct".to_string()));
    }
    helpers::fetch_exam(&state, &exam_id).await?;

    let now = primitive_now_utc();
    let question_id = Uuid::new_v4().to_string();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let question = repositories::questions::create(
        &mut *tx,
        repositories::questions::CreateQuestion {
            id: &question_id,
            exam_id: &exam_id,
            text: &payload.text,
            mark: payload.mark,
            position: payload.position,
            now,
        },
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Exam no longer exists", "Failed to create question"))?;

    let mut choices = Vec::with_capacity(payload.choices.len());
    for choice in &payload.choices {
        let created = repositories::choices::create(
            &mut *tx,
            repositories::choices::CreateChoice {
                id: &Uuid::new_v4().to_string(),
                question_id: &question_id,
                text: &choice.text,
                is_correct: choice.is_correct,
                now,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create choice"))?;
        choices.push(ChoiceResponse::from_db(created));
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from_db(question, choices))))
}

pub(super) async fn update_question(
    Path(question_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<QuestionUpdate>,
) -> Result<Json<QuestionResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let question = repositories::questions::update(
        state.db(),
        &question_id,
        repositories::questions::UpdateQuestion {
            text: payload.text,
            mark: payload.mark,
            position: payload.position,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update question"))?
    .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    let choices = repositories::choices::list_by_question(state.db(), &question.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list choices"))?;

    Ok(Json(QuestionResponse::from_db(
        question,
        choices.into_iter().map(ChoiceResponse::from_db).collect(),
    )))
}

pub(super) async fn delete_question(
    Path(question_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::questions::delete(state.db(), &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete question"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Question not found".to_string()))
    }
}

pub(super) async fn list_choices(
    Path(question_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
) -> Result<Json<Vec<ChoiceResponse>>, ApiError> {
    helpers::fetch_question(&state, &question_id).await?;

    let choices = repositories::choices::list_by_question(state.db(), &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list choices"))?;

    Ok(Json(choices.into_iter().map(ChoiceResponse::from_db).collect()))
}

pub(super) async fn create_choice(
    Path(question_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<ChoiceCreate>,
) -> Result<(StatusCode, Json<ChoiceResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    helpers::fetch_question(&state, &question_id).await?;

    let now = primitive_now_utc();
    let choice_id = Uuid::new_v4().to_string();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    if payload.is_correct {
        repositories::choices::clear_other_correct(&mut *tx, &question_id, &choice_id, now)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to clear correct choice"))?;
    }

    let choice = repositories::choices::create(
        &mut *tx,
        repositories::choices::CreateChoice {
            id: &choice_id,
            question_id: &question_id,
            text: &payload.text,
            is_correct: payload.is_correct,
            now,
        },
    )
    .await
    .map_err(|e| {
        ApiError::from_write(e, "Question changed concurrently", "Failed to create choice")
    })?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok((StatusCode::CREATED, Json(ChoiceResponse::from_db(choice))))
}

pub(super) async fn update_choice(
    Path(choice_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<ChoiceUpdate>,
) -> Result<Json<ChoiceResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let existing = repositories::choices::find_by_id(&mut *tx, &choice_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch choice"))?
        .ok_or_else(|| ApiError::NotFound("Choice not found".to_string()))?;

    if payload.is_correct == Some(true) {
        let cleared = repositories::choices::clear_other_correct(
            &mut *tx,
            &existing.question_id,
            &existing.id,
            now,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear correct choice"))?;
        if cleared > 0 {
            tracing::info!(
                question_id = %existing.question_id,
                choice_id = %existing.id,
                "Correct choice moved"
            );
        }
    }

    let choice =
        repositories::choices::update(&mut *tx, &choice_id, payload.text, payload.is_correct, now)
            .await
            .map_err(|e| {
                ApiError::from_write(e, "Question changed concurrently", "Failed to update choice")
            })?
            .ok_or_else(|| ApiError::NotFound("Choice not found".to_string()))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok(Json(ChoiceResponse::from_db(choice)))
}

pub(super) async fn delete_choice(
    Path(choice_id): Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::choices::delete(state.db(), &choice_id)
        .await
        .map_err(|e| ApiError::from_write(e, "Choice is still referenced", "Failed to delete choice"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Choice not found".to_string()))
    }
}
