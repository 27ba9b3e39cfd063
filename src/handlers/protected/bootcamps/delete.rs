// handlers/protected/bootcamps/delete.rs - DELETE /api/v1/bootcamps/:id handler

use axum::extract::{Path, State};
use serde_json::{json, Value};
use uuid::Uuid;

use super::owned_bootcamp;
use crate::middleware::{ApiResponse, ApiResult, Identity};
use crate::state::AppState;

pub async fn bootcamp_delete(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    owned_bootcamp(&state, &identity, id, "delete").await?;
    state.bootcamps.delete(id).await?;

    tracing::info!("User {} deleted bootcamp {}", identity.id(), id);
    Ok(ApiResponse::success(json!({})))
}
