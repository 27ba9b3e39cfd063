// handlers/protected/bootcamps/update.rs - PUT /api/v1/bootcamps/:id handler

use axum::extract::{Path, State};
use serde::Deserialize;
use uuid::Uuid;

use super::owned_bootcamp;
use crate::database::models::{Bootcamp, BootcampChanges};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, Identity};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateBootcampRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

pub async fn bootcamp_update(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateBootcampRequest>,
) -> ApiResult<Bootcamp> {
    owned_bootcamp(&state, &identity, id, "update").await?;

    let changes = BootcampChanges {
        name: payload.name.map(|n| n.trim().to_string()),
        description: payload.description,
        website: payload.website,
    };

    let bootcamp = state
        .bootcamps
        .update(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Bootcamp not found with id of {}", id)))?;

    Ok(ApiResponse::success(bootcamp))
}
