pub mod cookie;
pub mod password;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{SecurityConfig, MAX_JWT_EXPIRY_DAYS};
use crate::database::DatabaseError;

/// Session token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
    InvalidLifetime(i64),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
            JwtError::InvalidLifetime(days) => write!(f, "Invalid token lifetime: {} days", days),
        }
    }
}

impl std::error::Error for JwtError {}

/// Why a request failed to authenticate.
///
/// Every variant except `Storage` is a credential problem and is reported to
/// the client as the same 401; the variant itself only reaches the logs.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no bearer token presented")]
    MissingToken,

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("token subject {0} no longer exists")]
    SubjectMissing(Uuid),

    #[error("user lookup failed: {0}")]
    Storage(#[from] DatabaseError),
}

/// A freshly signed token and the instant it stops verifying
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens with the configured HS256 secret
pub struct SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl SessionTokens {
    pub fn new(security: &SecurityConfig) -> Result<Self, JwtError> {
        let secret = security.jwt_secret.as_bytes();
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let days = security.jwt_expiry_days;
        let lifetime = Duration::try_days(days)
            .filter(|_| (1..=MAX_JWT_EXPIRY_DAYS).contains(&days))
            .ok_or(JwtError::InvalidLifetime(days))?;

        // exp is a hard deadline, no clock-skew grace
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        })
    }

    pub fn issue(&self, user_id: Uuid) -> Result<IssuedToken, JwtError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Sign a token as if issued at `now`
    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<IssuedToken, JwtError> {
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| JwtError::TokenGeneration("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))?;

        // round down to whole seconds so the cookie matches the exp claim
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(expires_at);

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature and expiry, returning the verified claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                _ => AuthError::MalformedToken(e.to_string()),
            })
    }
}
