mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use reqwest::{header::COOKIE, StatusCode};
use serde_json::Value;

use bootcamp_api::auth::SessionTokens;
use bootcamp_api::config::AppConfig;
use bootcamp_api::database::UserStore;
use bootcamp_api::error::NOT_AUTHORIZED;
use bootcamp_api::types::Role;
use common::TestServer;

async fn me(server: &TestServer, authorization: Option<String>) -> Result<(StatusCode, Value)> {
    let mut req = server.client.get(server.url("/api/v1/auth/me"));
    if let Some(value) = authorization {
        req = req.header("Authorization", value);
    }
    let res = req.send().await?;
    let status = res.status();
    Ok((status, res.json().await?))
}

#[tokio::test]
async fn valid_token_resolves_identity() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (user, token) = server.signed_in("Reader", "reader@example.com", Role::User).await?;

    let (status, body) = me(&server, Some(format!("Bearer {}", token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user.id.to_string());
    Ok(())
}

#[tokio::test]
async fn every_credential_failure_looks_the_same() -> Result<()> {
    let server = TestServer::spawn().await?;
    let user = server.seed_user("Reader", "reader@example.com", Role::User).await?;
    let ghost = server.seed_user("Ghost", "ghost@example.com", Role::User).await?;

    let foreign = SessionTokens::new(&AppConfig::development().with_secret("someone-else").security)?
        .issue(user.id)?
        .token;
    let expired = server
        .state
        .tokens
        .issue_at(user.id, Utc::now() - Duration::days(31))?
        .token;
    let orphaned = server.state.tokens.issue(ghost.id)?.token;
    UserStore::delete(server.store.as_ref(), ghost.id).await?;

    let attempts = vec![
        ("missing header", None),
        ("wrong scheme", Some(format!("Basic {}", server.state.tokens.issue(user.id)?.token))),
        ("empty bearer", Some("Bearer ".to_string())),
        ("malformed", Some("Bearer not.a.jwt".to_string())),
        ("foreign signature", Some(format!("Bearer {}", foreign))),
        ("expired", Some(format!("Bearer {}", expired))),
        ("deleted subject", Some(format!("Bearer {}", orphaned))),
    ];

    for (case, authorization) in attempts {
        let (status, body) = me(&server, authorization).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", case);
        assert_eq!(body["success"], false, "{}", case);
        assert_eq!(body["error"], NOT_AUTHORIZED, "{}", case);
        assert_eq!(body["code"], "UNAUTHORIZED", "{}", case);
    }
    Ok(())
}

#[tokio::test]
async fn session_cookie_alone_is_not_accepted() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (_, token) = server.signed_in("Reader", "reader@example.com", Role::User).await?;

    let res = server
        .client
        .get(server.url("/api/v1/auth/me"))
        .header(COOKIE, format!("token={}", token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_reflects_current_role() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (user, token) = server.signed_in("Reader", "reader@example.com", Role::User).await?;

    // Role comes from storage on every request, not from the token
    UserStore::update(
        server.store.as_ref(),
        user.id,
        bootcamp_api::database::models::UserChanges {
            role: Some(Role::Publisher),
            ..Default::default()
        },
    )
    .await?;

    let (status, body) = me(&server, Some(format!("Bearer {}", token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "publisher");
    Ok(())
}
