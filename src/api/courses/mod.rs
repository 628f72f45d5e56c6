mod handlers;
mod units;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(handlers::list_courses).post(handlers::create_course))
        .route("/courses/enrolled", get(handlers::list_enrolled_courses))
        .route(
            "/courses/:course_id",
            get(handlers::get_course).patch(handlers::update_course).delete(handlers::delete_course),
        )
        .route("/courses/:course_id/enroll", post(handlers::enroll).delete(handlers::unenroll))
        .route("/courses/:course_id/enrollments", get(handlers::list_course_enrollments))
        .route("/courses/:course_id/units", get(units::list_units).post(units::create_unit))
        .route(
            "/units/:unit_id",
            get(units::get_unit).patch(units::update_unit).delete(units::delete_unit),
        )
        .route("/units/:unit_id/lessons", get(units::list_lessons).post(units::create_lesson))
        .route(
            "/lessons/:lesson_id",
            get(units::get_lesson).patch(units::update_lesson).delete(units::delete_lesson),
        )
}

#[cfg(test)]
mod tests;
