//! Session tokens for the browser session cookie.
//!
//! A session token is an HS256-signed JWT whose `jti` names a row in
//! `user_sessions`. Only the SHA-256 hash of the `jti` is stored, so a database
//! leak does not hand out live sessions, and logging out revokes the row even
//! though the signed token itself would still verify.

use bookreview_core::types::{DbId, Timestamp};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{parse_env, ConfigError};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "bookreview_session";

/// Default session lifetime in days.
const DEFAULT_EXPIRY_DAYS: i64 = 14;

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Session id; its hash is the lookup key in `user_sessions`.
    pub jti: String,
}

/// Configuration for session token signing and lifetime.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session lifetime in days (default: 14).
    pub expiry_days: i64,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var               | Required | Default |
    /// |-----------------------|----------|---------|
    /// | `SESSION_SECRET`      | **yes**  | --      |
    /// | `SESSION_EXPIRY_DAYS` | no       | `14`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("SESSION_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("SESSION_SECRET"))?;
        let expiry_days = parse_env("SESSION_EXPIRY_DAYS", DEFAULT_EXPIRY_DAYS)?;
        if expiry_days <= 0 {
            return Err(ConfigError::Invalid {
                var: "SESSION_EXPIRY_DAYS",
                value: expiry_days.to_string(),
            });
        }
        Ok(Self {
            secret,
            expiry_days,
        })
    }

    /// Session lifetime in seconds, for the cookie `Max-Age`.
    pub fn max_age_secs(&self) -> i64 {
        self.expiry_days * 24 * 60 * 60
    }
}

/// A freshly issued session: the token for the cookie plus what to persist.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

/// Issue a signed session token for `user_id`.
pub fn issue_session(
    user_id: DbId,
    config: &SessionConfig,
) -> Result<IssuedSession, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + Duration::days(config.expiry_days);
    let jti = Uuid::new_v4().to_string();

    let claims = SessionClaims {
        sub: user_id,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
        jti: jti.clone(),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(IssuedSession {
        token,
        token_hash: hash_session_id(&jti),
        expires_at,
    })
}

/// Validate and decode a session token, returning the embedded [`SessionClaims`].
///
/// Validates the signature and expiration.
pub fn validate_session_token(
    token: &str,
    config: &SessionConfig,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Compute the SHA-256 hex digest of a session id.
pub fn hash_session_id(jti: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(jti.as_bytes());
    format!("{:x}", hasher.finalize())
}
