//! Authentication and authorization gates

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::api::SharedState;
use crate::error::{AuthError, Error, Result};

/// Identity attached to a request once its token has been verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub account_id: String,
}

/// Read the raw `authorization` header value. No scheme prefix is stripped.
pub fn token_from_headers(headers: &axum::http::HeaderMap) -> std::result::Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("authorization header is not valid ASCII".to_string()))
}

/// Authentication gate: only requests carrying a valid token reach the next stage
pub async fn require_sign_in(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let claims = token_from_headers(req.headers()).and_then(|token| state.tokens.verify(token));

    let claims = match claims {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, path = %req.uri().path(), "rejected unauthenticated request");
            return Err(e.into());
        }
    };

    req.extensions_mut().insert(Identity {
        account_id: claims.sub,
    });

    Ok(next.run(req).await)
}

/// Authorization gate: admits only privileged accounts. Must run after `require_sign_in`.
pub async fn is_admin(State(state): State<SharedState>, req: Request, next: Next) -> Result<Response> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .cloned()
        .ok_or(AuthError::MissingToken)?;

    let account = state.accounts.find_by_id(&identity.account_id).await?;

    match account {
        Some(account) if account.is_admin() => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!(account_id = %identity.account_id, "non-admin account denied");
            Err(AuthError::Unauthorized.into())
        }
        None => {
            tracing::warn!(account_id = %identity.account_id, "token refers to unknown account");
            Err(AuthError::Unauthorized.into())
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn test_no_header() {
        let headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_raw_header_value_is_used() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        // The scheme is part of the token as far as the gate is concerned
        assert_eq!(token_from_headers(&headers), Ok("Bearer abc.def.ghi"));
    }
}
