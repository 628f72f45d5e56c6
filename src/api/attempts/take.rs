use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::schemas::attempt::SaveAnswersRequest;
use crate::services::attempts::{self, SaveOutcome, StartOutcome, TakeOutcome};

use super::helpers::{redirect_to_result, redirect_to_take};

pub(super) async fn start_attempt(
    Path(exam_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let outcome = attempts::start_or_resume(&state, &exam_id, &user.id).await?;

    Ok(match outcome {
        StartOutcome::Created(attempt) | StartOutcome::Resumed(attempt) => {
            redirect_to_take(state.settings(), &attempt.id)
        }
        StartOutcome::AlreadySubmitted(attempt) => redirect_to_result(state.settings(), &attempt.id),
    })
}

pub(super) async fn get_attempt(
    Path(attempt_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    render_take(&state, &attempt_id, &user.id).await
}

pub(super) async fn save_answers(
    Path(attempt_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SaveAnswersRequest>,
) -> Result<Response, ApiError> {
    match attempts::save_answers(&state, &attempt_id, &user.id, &payload.answers).await? {
        SaveOutcome::Saved(attempt) => render_take(&state, &attempt.id, &user.id).await,
        SaveOutcome::AlreadySubmitted => Ok(redirect_to_result(state.settings(), &attempt_id)),
    }
}

async fn render_take(state: &AppState, attempt_id: &str, user_id: &str) -> Result<Response, ApiError> {
    Ok(match attempts::load_take(state, attempt_id, user_id).await? {
        TakeOutcome::Take(view) => Json(view).into_response(),
        TakeOutcome::Submitted => redirect_to_result(state.settings(), attempt_id),
    })
}
