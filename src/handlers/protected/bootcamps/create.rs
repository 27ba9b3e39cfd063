// handlers/protected/bootcamps/create.rs - POST /api/v1/bootcamps handler

use axum::extract::State;
use serde::Deserialize;

use crate::database::models::{Bootcamp, NewBootcamp};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, Identity};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBootcampRequest {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
}

/// Publishers may own a single bootcamp; admins any number
pub async fn bootcamp_create(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(payload): ApiJson<CreateBootcampRequest>,
) -> ApiResult<Bootcamp> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::field_error("name", "Please add a name"));
    }
    if payload.description.trim().is_empty() {
        return Err(ApiError::field_error("description", "Please add a description"));
    }

    let new_bootcamp = NewBootcamp {
        name: payload.name.trim().to_string(),
        description: payload.description,
        website: payload.website,
        owner: identity.id(),
    };

    let bootcamp = if identity.is_admin() {
        state.bootcamps.create(new_bootcamp).await?
    } else {
        state
            .bootcamps
            .create_first(new_bootcamp)
            .await?
            .ok_or_else(|| {
                ApiError::bad_request(format!(
                    "The user with ID {} has already published a bootcamp",
                    identity.id()
                ))
            })?
    };

    tracing::info!("User {} created bootcamp {}", identity.id(), bootcamp.id);
    Ok(ApiResponse::created(bootcamp))
}
