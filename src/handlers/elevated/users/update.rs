use axum::extract::{Path, State};
use serde::Deserialize;
use uuid::Uuid;

use super::user_not_found;
use crate::database::models::{User, UserChanges};
use crate::handlers::public::auth::utils::{validate_email_format, validate_name};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, Identity};
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// PUT /api/v1/users/:id - Change name, email or role
///
/// Passwords are only changed through the auth endpoints.
pub async fn user_update(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> ApiResult<User> {
    if let Some(name) = payload.name.as_deref() {
        validate_name(name)?;
    }
    if let Some(email) = payload.email.as_deref() {
        validate_email_format(email)?;
    }

    let changes = UserChanges {
        name: payload.name.map(|n| n.trim().to_string()),
        email: payload.email.map(|e| e.trim().to_lowercase()),
        role: payload.role,
    };

    let user = state
        .users
        .update(id, changes)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    tracing::info!("Admin {} updated user {}", identity.id(), id);
    Ok(ApiResponse::success(user))
}
