use axum::response::{IntoResponse, Redirect, Response};

use crate::core::config::Settings;

pub(super) fn take_path(settings: &Settings, attempt_id: &str) -> String {
    format!("{}/attempts/{attempt_id}", settings.api().api_v1_str)
}

pub(super) fn result_path(settings: &Settings, attempt_id: &str) -> String {
    format!("{}/attempts/{attempt_id}/result", settings.api().api_v1_str)
}

/// 303 to the take view of an in-progress attempt.
pub(super) fn redirect_to_take(settings: &Settings, attempt_id: &str) -> Response {
    Redirect::to(&take_path(settings, attempt_id)).into_response()
}

/// 303 to the read-only result of a submitted attempt.
pub(super) fn redirect_to_result(settings: &Settings, attempt_id: &str) -> Response {
    Redirect::to(&result_path(settings, attempt_id)).into_response()
}
