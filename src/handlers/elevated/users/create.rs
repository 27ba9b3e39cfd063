use axum::extract::State;
use serde::Deserialize;

use crate::auth::password::hash_password;
use crate::database::models::{NewUser, User};
use crate::handlers::public::auth::utils::{validate_email_format, validate_name, validate_password};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, Identity};
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// POST /api/v1/users - Create an account with any role, admin included
pub async fn user_create(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<User> {
    validate_name(&payload.name)?;
    validate_email_format(&payload.email)?;
    validate_password(&payload.password)?;

    let user = state
        .users
        .create(NewUser {
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_lowercase(),
            role: payload.role,
            password_hash: hash_password(&payload.password)?,
        })
        .await?;

    tracing::info!("Admin {} created user {} as {}", identity.id(), user.id, user.role);
    Ok(ApiResponse::created(user))
}
