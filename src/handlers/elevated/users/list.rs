use axum::extract::State;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/v1/users - Every account, newest last
pub async fn user_list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.users.list().await?;
    Ok(ApiResponse::list(users))
}
