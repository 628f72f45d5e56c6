use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::{has_sqlstate, sqlstate};
use crate::services::attempts::AttemptError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    detail: String,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }

    /// Maps constraint violations to `Conflict`; everything else is logged as internal.
    pub(crate) fn from_write(err: sqlx::Error, conflict: &str, context: &str) -> Self {
        if has_sqlstate(&err, sqlstate::UNIQUE_VIOLATION)
            || has_sqlstate(&err, sqlstate::FOREIGN_KEY_VIOLATION)
        {
            return Self::Conflict(conflict.to_string());
        }
        if has_sqlstate(&err, sqlstate::ATTEMPT_FROZEN) {
            return Self::Conflict("Submitted attempts cannot change".to_string());
        }
        Self::internal(err, context)
    }
}

impl From<AttemptError> for ApiError {
    fn from(err: AttemptError) -> Self {
        match err {
            AttemptError::NotFound(message) => Self::NotFound(message.to_string()),
            AttemptError::Validation(err) => Self::BadRequest(err.to_string()),
            AttemptError::Conflict(message) => Self::Conflict(message.to_string()),
            AttemptError::Database(err) => {
                Self::from_write(err, "Exam attempt changed concurrently", "Exam attempt failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                let status = StatusCode::UNAUTHORIZED;
                let mut response = (
                    status,
                    Json(ErrorResponse { status: status.as_u16(), detail: message.to_string() }),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            ApiError::Forbidden(message) => {
                let status = StatusCode::FORBIDDEN;
                (
                    status,
                    Json(ErrorResponse { status: status.as_u16(), detail: message.to_string() }),
                )
                    .into_response()
            }
            ApiError::BadRequest(message) => {
                let status = StatusCode::BAD_REQUEST;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
            ApiError::NotFound(message) => {
                let status = StatusCode::NOT_FOUND;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
            ApiError::Conflict(message) => {
                let status = StatusCode::CONFLICT;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scoring::ScoringError;

    #[test]
    fn attempt_errors_map_to_http_statuses() {
        let not_found: ApiError = AttemptError::NotFound("Attempt not found").into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let invalid: ApiError =
            AttemptError::Validation(ScoringError::UnknownQuestion("q9".to_string())).into();
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

        let conflict: ApiError = AttemptError::Conflict("Could not start exam attempt").into();
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn unauthorized_sets_bearer_challenge() {
        let response = ApiError::Unauthorized("nope").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }

    #[test]
    fn non_database_errors_become_internal() {
        let err = ApiError::from_write(sqlx::Error::RowNotFound, "dup", "Failed");
        assert!(matches!(err, ApiError::Internal(ref message) if message == "Failed"));
    }
}
