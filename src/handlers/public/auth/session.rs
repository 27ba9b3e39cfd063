use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::utils::send_token_response;
use crate::auth::{cookie, password::verify_password};
use crate::error::ApiError;
use crate::middleware::ApiJson;
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Bad credentials";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/v1/auth/login - Authenticate user and receive JWT token
///
/// Expected Input:
/// ```json
/// { "email": "john@gmail.com", "password": "123456" }
/// ```
///
/// Unknown email and wrong password produce the same 401 so that the
/// response does not reveal which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let (email, password) = match (payload.email, payload.password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => return Err(ApiError::bad_request("Please provide an email and password")),
    };

    let user = match state.users.find_by_email(email.trim()).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login failed: unknown email");
            return Err(ApiError::unauthorized(BAD_CREDENTIALS));
        }
    };

    if !verify_password(&user.password_hash, &password) {
        tracing::warn!("Login failed: wrong password for user {}", user.id);
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    tracing::info!("User {} logged in", user.id);
    send_token_response(&state, &user, StatusCode::OK)
}

/// GET /api/v1/auth/logout - Overwrite the session cookie
///
/// Tokens are stateless, so a bearer token held elsewhere stays valid until
/// it expires.
pub async fn logout() -> Result<Response, ApiError> {
    let cookie = cookie::logout_cookie(Utc::now())
        .ok_or_else(|| ApiError::internal_server_error("Could not build session cookie"))?;

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(json!({ "success": true, "data": {} })),
    )
        .into_response())
}
