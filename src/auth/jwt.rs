//! JWT token handling

use std::time::Duration;

use crate::error::{AuthError, Result};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims for an account, valid for `ttl` from now
    pub fn new(account_id: &str, ttl: Duration) -> Self {
        let now = chrono::Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            sub: account_id.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
        }
    }

    /// Expired once the clock reaches `exp`, no leeway
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() >= self.exp
    }
}

/// Issue a signed token for an account
pub fn issue_token(account_id: &str, secret: &[u8], ttl: Duration) -> Result<String> {
    let claims = Claims::new(account_id, ttl);
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )?)
}

/// Validate and decode a token
pub fn verify_token(token: &str, secret: &[u8]) -> std::result::Result<Claims, AuthError> {
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let mut validation = Validation::default();
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken(e.to_string()),
        })?;

    // The library accepts a token during its final second; tighten to `now < exp`
    if claims.is_expired() {
        return Err(AuthError::TokenExpired);
    }

    Ok(claims)
}

/// Issues and verifies tokens with the process-wide secret and lifetime
#[derive(Clone)]
pub struct TokenManager {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenManager {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, account_id: &str) -> Result<String> {
        issue_token(account_id, &self.secret, self.ttl)
    }

    pub fn verify(&self, token: &str) -> std::result::Result<Claims, AuthError> {
        verify_token(token, &self.secret)
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}
