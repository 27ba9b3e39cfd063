use axum::extract::{Path, State};
use uuid::Uuid;

use super::user_not_found;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/v1/users/:id
pub async fn user_show(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<User> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    Ok(ApiResponse::success(user))
}
