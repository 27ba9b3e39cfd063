// handlers/public/auth/register.rs - POST /api/v1/auth/register handler

use axum::{extract::State, http::StatusCode, response::Response};
use serde::Deserialize;

use super::utils::{send_token_response, validate_email_format, validate_name, validate_password};
use crate::auth::password::hash_password;
use crate::database::models::NewUser;
use crate::error::ApiError;
use crate::middleware::ApiJson;
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// POST /api/v1/auth/register - Create an account and receive a session token
///
/// Expected Input:
/// ```json
/// {
///   "name": "John Doe",
///   "email": "john@gmail.com",
///   "password": "123456",
///   "role": "publisher"      // Optional: "user" (default) or "publisher"
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<Response, ApiError> {
    validate_name(&payload.name)?;
    validate_email_format(&payload.email)?;
    validate_password(&payload.password)?;

    if !payload.role.is_self_assignable() {
        return Err(ApiError::field_error(
            "role",
            format!("Role {} cannot be chosen at registration", payload.role),
        ));
    }

    let user = state
        .users
        .create(NewUser {
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_lowercase(),
            role: payload.role,
            password_hash: hash_password(&payload.password)?,
        })
        .await?;

    tracing::info!("Registered user {} as {}", user.id, user.role);
    send_token_response(&state, &user, StatusCode::OK)
}
