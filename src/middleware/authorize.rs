use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::Identity;
use crate::error::{ApiError, NOT_AUTHORIZED};
use crate::types::Role;

/// Role gate. Must sit behind [`super::protect`]; a request without an
/// identity is rejected rather than let through.
///
/// ```ignore
/// .route_layer(middleware::from_fn(|req: Request, next: Next| authorize(ADMIN_ROLES, req, next)))
/// .route_layer(middleware::from_fn_with_state(state.clone(), protect))
/// ```
pub async fn authorize(
    allowed: &'static [Role],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let role = match request.extensions().get::<Identity>() {
        Some(identity) => identity.role(),
        None => {
            tracing::error!("Role check on {} ran before protect", request.uri().path());
            return Err(ApiError::unauthorized(NOT_AUTHORIZED));
        }
    };

    if !allowed.contains(&role) {
        tracing::warn!("Role {} denied on {}", role, request.uri().path());
        return Err(ApiError::forbidden(format!(
            "User role {} is not authorized to access this route",
            role
        )));
    }

    Ok(next.run(request).await)
}
