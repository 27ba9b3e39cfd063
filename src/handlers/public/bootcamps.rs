// handlers/public/bootcamps.rs - Read-only bootcamp endpoints

use axum::extract::{Path, State};
use uuid::Uuid;

use crate::database::models::Bootcamp;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/v1/bootcamps
pub async fn bootcamp_list(State(state): State<AppState>) -> ApiResult<Vec<Bootcamp>> {
    let bootcamps = state.bootcamps.list().await?;
    Ok(ApiResponse::list(bootcamps))
}

/// GET /api/v1/bootcamps/:id
pub async fn bootcamp_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Bootcamp> {
    let bootcamp = state
        .bootcamps
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Bootcamp not found with id of {}", id)))?;

    Ok(ApiResponse::success(bootcamp))
}
