mod handlers;
mod helpers;
mod questions;

use axum::{routing::get, routing::patch, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/exams", get(handlers::list_exams).post(handlers::create_exam))
        .route(
            "/exams/:exam_id",
            get(handlers::get_exam).patch(handlers::update_exam).delete(handlers::delete_exam),
        )
        .route(
            "/exams/:exam_id/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/questions/:question_id",
            patch(questions::update_question).delete(questions::delete_question),
        )
        .route(
            "/questions/:question_id/choices",
            get(questions::list_choices).post(questions::create_choice),
        )
        .route("/choices/:choice_id", patch(questions::update_choice).delete(questions::delete_choice))
}
