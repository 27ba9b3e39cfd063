use axum::{
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::auth::cookie;
use crate::auth::password::MIN_PASSWORD_LENGTH;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Issue a session token for `user` and send it as cookie and body field
///
/// Output:
/// ```json
/// { "success": true, "token": "eyJhbGciOiJIUzI1NiI..." }
/// ```
pub fn send_token_response(
    state: &AppState,
    user: &User,
    status: StatusCode,
) -> Result<Response, ApiError> {
    let issued = state.tokens.issue(user.id)?;
    let cookie = cookie::session_cookie(&issued, state.config.secure_cookies())
        .ok_or_else(|| ApiError::internal_server_error("Could not build session cookie"))?;

    Ok((
        status,
        [(SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "token": issued.token
        })),
    )
        .into_response())
}

/// Basic email validation for registration and user management.
pub fn validate_email_format(email: &str) -> Result<(), ApiError> {
    let invalid = || ApiError::field_error("email", "Please add a valid email");

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || local.contains(char::is_whitespace) {
        return Err(invalid());
    }

    // Domain needs at least one dot with labels on both sides
    let mut labels = domain.split('.');
    let has_dot = domain.contains('.');
    if !has_dot || labels.any(|l| l.is_empty() || l.contains(char::is_whitespace)) {
        return Err(invalid());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::field_error(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::field_error("name", "Please add a name"));
    }
    Ok(())
}
