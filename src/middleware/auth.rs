use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::AuthError;
use crate::database::models::User;
use crate::error::{ApiError, NOT_AUTHORIZED};
use crate::state::AppState;
use crate::types::Role;

/// Resolved user attached to a request by [`protect`]
#[derive(Clone, Debug)]
pub struct Identity {
    pub user: User,
}

impl Identity {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }

    /// Owner of the resource, or an admin
    pub fn can_modify(&self, owner: Uuid) -> bool {
        self.is_admin() || self.user.id == owner
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Identity>().cloned().ok_or_else(|| {
            tracing::error!("Identity requested on {} without protect middleware", parts.uri.path());
            ApiError::unauthorized(NOT_AUTHORIZED)
        })
    }
}

/// Token verifier: resolves the bearer token to a user or rejects with 401
pub async fn protect(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = resolve_identity(&state, request.headers()).await?;

    tracing::debug!("Authenticated user {} ({})", identity.user.id, identity.user.role);
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Run the verification steps without touching the request
pub async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Result<Identity, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
    let claims = state.tokens.verify(token)?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or(AuthError::SubjectMissing(claims.sub))?;

    Ok(Identity { user })
}

/// Extract `<token>` from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::models::NewUser;
    use crate::database::{MemoryStore, UnavailableStore, UserStore};
    use crate::services::MemoryMailer;
    use axum::{
        body::Body,
        http::{HeaderValue, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state_with(users: Arc<dyn UserStore>) -> AppState {
        AppState::new(
            AppConfig::development().with_secret("test-secret"),
            users,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryMailer::new()),
        )
        .unwrap()
    }

    async fn whoami(identity: Identity) -> String {
        identity.id().to_string()
    }

    fn router(state: AppState) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), protect))
            .with_state(state)
    }

    fn get_me(auth: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/me");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn seeded() -> (AppState, Arc<MemoryStore>, User) {
        let store = Arc::new(MemoryStore::new());
        let user = UserStore::create(
            store.as_ref(),
            NewUser {
                name: "Reader".into(),
                email: "reader@example.com".into(),
                role: Role::User,
                password_hash: "unused".into(),
            },
        )
        .await
        .unwrap();
        (state_with(store.clone()), store, user)
    }

    #[test]
    fn bearer_token_requires_scheme_and_value() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[tokio::test]
    async fn valid_token_attaches_identity() {
        let (state, _, user) = seeded().await;
        let token = state.tokens.issue(user.id).unwrap().token;

        let response = router(state)
            .oneshot(get_me(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, user.id.to_string());
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let (state, _, _) = seeded().await;
        let response = router(state).oneshot(get_me(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn deleted_subject_is_unauthorized() {
        let (state, store, user) = seeded().await;
        let token = state.tokens.issue(user.id).unwrap().token;
        UserStore::delete(store.as_ref(), user.id).await.unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token)).unwrap());
        let err = resolve_identity(&state, &headers).await.unwrap_err();
        assert!(matches!(err, AuthError::SubjectMissing(id) if id == user.id));

        let response = router(state)
            .oneshot(get_me(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn storage_failure_is_not_reported_as_bad_credentials() {
        let state = state_with(Arc::new(UnavailableStore));
        let token = state.tokens.issue(Uuid::new_v4()).unwrap().token;

        let response = router(state)
            .oneshot(get_me(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn extractor_fails_closed_without_protect() {
        let (state, _, _) = seeded().await;
        let app = Router::new().route("/me", get(whoami)).with_state(state);

        let response = app.oneshot(get_me(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
