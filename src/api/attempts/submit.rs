use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::services::attempts::{self, ResultOutcome, SubmitOutcome};

use super::helpers::{redirect_to_result, redirect_to_take};

pub(super) async fn submit_attempt(
    Path(attempt_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    Ok(match attempts::submit(&state, &attempt_id, &user.id).await? {
        SubmitOutcome::Submitted(attempt) => redirect_to_result(state.settings(), &attempt.id),
        SubmitOutcome::AlreadySubmitted => {
            tracing::debug!(attempt_id = %attempt_id, "Repeated submit ignored");
            redirect_to_result(state.settings(), &attempt_id)
        }
    })
}

pub(super) async fn get_result(
    Path(attempt_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    Ok(match attempts::load_result(&state, &attempt_id, &user.id).await? {
        ResultOutcome::Result(view) => Json(view).into_response(),
        ResultOutcome::InProgress => redirect_to_take(state.settings(), &attempt_id),
    })
}
