mod helpers;
mod list;
mod submit;
mod take;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/exams/:exam_id/start", get(take::start_attempt))
        .route("/attempts", get(list::list_my_attempts))
        .route("/attempts/:attempt_id", get(take::get_attempt).post(take::save_answers))
        .route("/attempts/:attempt_id/submit", post(submit::submit_attempt))
        .route("/attempts/:attempt_id/result", get(submit::get_result))
}

#[cfg(test)]
mod tests;
