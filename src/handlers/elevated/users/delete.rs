use axum::extract::{Path, State};
use serde_json::{json, Value};
use uuid::Uuid;

use super::user_not_found;
use crate::middleware::{ApiResponse, ApiResult, Identity};
use crate::state::AppState;

/// DELETE /api/v1/users/:id - Remove an account and the bootcamps it owns
pub async fn user_delete(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    if !state.users.delete(id).await? {
        return Err(user_not_found(id));
    }

    tracing::info!("Admin {} deleted user {}", identity.id(), id);
    Ok(ApiResponse::success(json!({})))
}
