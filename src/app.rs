use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{from_fn, from_fn_with_state, Next},
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::handlers::{elevated, protected, public};
use crate::middleware::{authorize, protect};
use crate::state::AppState;
use crate::types::{ADMIN_ROLES, PUBLISHER_ROLES};

/// Full router: public, protected and admin groups plus global layers
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        .merge(bootcamp_public_routes())
        // Bearer token required
        .merge(auth_routes(&state))
        .merge(bootcamp_routes(&state))
        // Admin only
        .merge(user_routes(&state))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", get(auth::logout))
        .route("/api/v1/auth/forgotpassword", post(auth::forgot_password))
        .route("/api/v1/auth/resetpassword/:resettoken", put(auth::reset_password))
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/me", get(protected::account_me))
        .route("/api/v1/auth/updatedetails", put(protected::account_update_details))
        .route("/api/v1/auth/updatepassword", put(protected::account_update_password))
        .route_layer(from_fn_with_state(state.clone(), protect))
}

fn bootcamp_public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/bootcamps", get(public::bootcamp_list))
        .route("/api/v1/bootcamps/:id", get(public::bootcamp_show))
}

// Layers run bottom-up: protect resolves the caller before authorize checks the role
fn bootcamp_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/bootcamps", post(protected::bootcamp_create))
        .route(
            "/api/v1/bootcamps/:id",
            put(protected::bootcamp_update).delete(protected::bootcamp_delete),
        )
        .route_layer(from_fn(|req: Request, next: Next| {
            authorize(PUBLISHER_ROLES, req, next)
        }))
        .route_layer(from_fn_with_state(state.clone(), protect))
}

fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/users",
            get(elevated::user_list).post(elevated::user_create),
        )
        .route(
            "/api/v1/users/:id",
            get(elevated::user_show)
                .put(elevated::user_update)
                .delete(elevated::user_delete),
        )
        .route_layer(from_fn(|req: Request, next: Next| {
            authorize(ADMIN_ROLES, req, next)
        }))
        .route_layer(from_fn_with_state(state.clone(), protect))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = &config.security.cors_origins;
    let wildcard = origins.iter().any(|o| o == "*");

    if wildcard || config.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Bootcamp API",
            "version": version,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public_auth": "/api/v1/auth/register, /login, /logout, /forgotpassword, /resetpassword/:resettoken (public)",
                "auth": "/api/v1/auth/me, /updatedetails, /updatepassword (protected)",
                "bootcamps": "/api/v1/bootcamps[/:id] (public read, publisher or admin write)",
                "users": "/api/v1/users[/:id] (admin)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.users.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{MemoryStore, UnavailableStore};
    use crate::services::MemoryMailer;
    use axum::body::Body;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            AppConfig::development().with_secret("test-secret"),
            store.clone(),
            store,
            Arc::new(MemoryMailer::new()),
        )
        .unwrap();
        app(state)
    }

    fn request(method: &str, uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok_with_reachable_store() {
        let response = test_app().oneshot(request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_hides_database_error_details() {
        let state = AppState::new(
            AppConfig::development().with_secret("test-secret"),
            Arc::new(UnavailableStore),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryMailer::new()),
        )
        .unwrap();

        let response = app(state).oneshot(request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains(UnavailableStore::DETAIL));
        assert!(!text.contains("database_error"));

        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["data"]["database"], "unavailable");
    }

    #[tokio::test]
    async fn bootcamp_reads_are_public() {
        let response = test_app()
            .oneshot(request("GET", "/api/v1/bootcamps"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn bootcamp_writes_require_a_token() {
        let response = test_app()
            .oneshot(request("POST", "/api/v1/bootcamps"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn user_admin_requires_a_token() {
        let response = test_app().oneshot(request("GET", "/api/v1/users")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn production_cors_skips_invalid_origins() {
        let mut config = AppConfig::production().with_secret("s");
        config.security.cors_origins =
            vec!["https://bootcamps.example.com".to_string(), "bad\norigin".to_string()];
        let _ = cors_layer(&config);
    }
}
