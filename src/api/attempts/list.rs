use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::pagination::{PaginatedResponse, Window};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::attempt::{AttemptListItem, AttemptListQuery};

pub(super) async fn list_my_attempts(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<AttemptListQuery>,
) -> Result<Json<PaginatedResponse<AttemptListItem>>, ApiError> {
    let window = Window::clamp(params.skip, params.limit);

    let rows = repositories::attempts::list_by_user(
        state.db(),
        &user.id,
        params.status,
        window.skip,
        window.limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list attempts"))?;
    let total_count = repositories::attempts::count_by_user(state.db(), &user.id, params.status)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count attempts"))?;

    Ok(Json(PaginatedResponse::new(
        rows.into_iter().map(AttemptListItem::from_row).collect(),
        total_count,
        window,
    )))
}
