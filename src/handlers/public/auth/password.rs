use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use chrono::{Duration, Utc};
use serde::Deserialize;

use super::utils::{send_token_response, validate_password};
use crate::auth::password::{digest_reset_token, generate_reset_token, hash_password};
use crate::database::models::ResetToken;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::Email;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// POST /api/v1/auth/forgotpassword - Mail a single-use password reset link
///
/// The link stays valid for `security.reset_token_expiry_minutes`. Only the
/// SHA-256 digest of the token is stored.
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ForgotPasswordRequest>,
) -> ApiResult<&'static str> {
    let user = state
        .users
        .find_by_email(payload.email.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("There is no user with that email"))?;

    let token = generate_reset_token()?;
    let minutes = state.config.security.reset_token_expiry_minutes;
    let expires_at = Duration::try_minutes(minutes)
        .filter(|ttl| *ttl > Duration::zero())
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| {
            tracing::error!("Reset token lifetime of {} minutes is out of range", minutes);
            ApiError::internal_server_error("Could not issue reset token")
        })?;
    state
        .users
        .set_reset_token(
            user.id,
            Some(ResetToken {
                token_hash: digest_reset_token(&token),
                expires_at,
            }),
        )
        .await?;

    let reset_url = format!(
        "{}/api/v1/auth/resetpassword/{}",
        state.config.server.public_url.trim_end_matches('/'),
        token
    );
    let email = Email {
        to: user.email.clone(),
        subject: "Password reset token".to_string(),
        body: format!(
            "You are receiving this email because you (or someone else) has requested \
             the reset of a password. Please make a PUT request to: \n\n {}",
            reset_url
        ),
    };

    if let Err(e) = state.mailer.send(email).await {
        // Don't leave a live token behind for a mail nobody received
        state.users.set_reset_token(user.id, None).await?;
        return Err(e.into());
    }

    tracing::info!("Password reset requested for user {}", user.id);
    Ok(ApiResponse::success("Email sent"))
}

/// PUT /api/v1/auth/resetpassword/:resettoken - Set a new password with a mailed token
pub async fn reset_password(
    State(state): State<AppState>,
    Path(reset_token): Path<String>,
    ApiJson(payload): ApiJson<ResetPasswordRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .users
        .find_by_reset_token(&digest_reset_token(&reset_token), Utc::now())
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid token"))?;

    validate_password(&payload.password)?;
    state
        .users
        .set_password(user.id, hash_password(&payload.password)?)
        .await?;

    tracing::info!("Password reset completed for user {}", user.id);
    send_token_response(&state, &user, StatusCode::OK)
}
