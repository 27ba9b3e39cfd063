use axum::{extract::State, http::StatusCode, response::Response};
use serde::Deserialize;

use crate::auth::password::{hash_password, verify_password};
use crate::database::models::{User, UserChanges};
use crate::error::ApiError;
use crate::handlers::public::auth::utils::{
    send_token_response, validate_email_format, validate_name, validate_password,
};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, Identity};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateDetailsRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// GET /api/v1/auth/me - The user behind the presented token
pub async fn me(identity: Identity) -> ApiResult<User> {
    Ok(ApiResponse::success(identity.user))
}

/// PUT /api/v1/auth/updatedetails - Change own name and/or email
///
/// Role and password cannot be changed here.
pub async fn update_details(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(payload): ApiJson<UpdateDetailsRequest>,
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
        role: None,
    };

    let user = state
        .users
        .update(identity.id(), changes)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found with id of {}", identity.id())))?;

    Ok(ApiResponse::success(user))
}

/// PUT /api/v1/auth/updatepassword - Change own password, receive a fresh token
///
/// Expected Input:
/// ```json
/// { "currentPassword": "123456", "newPassword": "1234567" }
/// ```
pub async fn update_password(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(payload): ApiJson<UpdatePasswordRequest>,
) -> Result<Response, ApiError> {
    if !verify_password(&identity.user.password_hash, &payload.current_password) {
        tracing::warn!("Password change rejected for user {}", identity.id());
        return Err(ApiError::unauthorized("Password is incorrect"));
    }

    validate_password(&payload.new_password)?;
    state
        .users
        .set_password(identity.id(), hash_password(&payload.new_password)?)
        .await?;

    send_token_response(&state, &identity.user, StatusCode::OK)
}
