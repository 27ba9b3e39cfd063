#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use bootcamp_api::auth::password::hash_password;
use bootcamp_api::config::AppConfig;
use bootcamp_api::database::models::{NewUser, User};
use bootcamp_api::database::{MemoryStore, UserStore};
use bootcamp_api::services::MemoryMailer;
use bootcamp_api::types::Role;
use bootcamp_api::{app, AppState};

pub const PASSWORD: &str = "123456";

/// In-process server on its own port, backed by in-memory collaborators
///
/// The server task lives on the calling test's runtime, so every test gets a
/// fresh store and nothing leaks between tests.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<MemoryMailer>,
    pub state: AppState,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_mailer(MemoryMailer::new()).await
    }

    pub async fn spawn_with_mailer(mailer: MemoryMailer) -> Result<Self> {
        Self::spawn_configured(mailer, |_| {}).await
    }

    /// Spawn with a config adjusted by `configure` after the test defaults are set
    pub async fn spawn_configured(
        mailer: MemoryMailer,
        configure: impl FnOnce(&mut AppConfig),
    ) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development().with_secret("integration-test-secret");
        config.server.port = port;
        config.server.public_url = base_url.clone();
        configure(&mut config);

        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(mailer);
        let state = AppState::new(config, store.clone(), store.clone(), mailer.clone())?;

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        let router = app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            port,
            base_url,
            client: reqwest::Client::new(),
            store,
            mailer,
            state,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Insert a user straight into the store, bypassing registration rules
    pub async fn seed_user(&self, name: &str, email: &str, role: Role) -> Result<User> {
        let user = UserStore::create(
            self.store.as_ref(),
            NewUser {
                name: name.to_string(),
                email: email.to_string(),
                role,
                password_hash: hash_password(PASSWORD)?,
            },
        )
        .await?;
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

        let body: Value = res.json().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response carried no token")
    }

    /// Seed a user and return it with a live session token
    pub async fn signed_in(&self, name: &str, email: &str, role: Role) -> Result<(User, String)> {
        let user = self.seed_user(name, email, role).await?;
        let token = self.login(email, PASSWORD).await?;
        Ok((user, token))
    }
}
