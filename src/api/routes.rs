//! API route handlers

use axum::{
    extract::{FromRequest, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::server::SharedState;
use crate::auth::models::{
    AccountUpdate, ForgotPasswordRequest, LoginData, LoginRequest, NewAccount, RegisterRequest,
    UpdateProfileRequest, UpdatedUserData, UserData,
};
use crate::auth::Identity;
use crate::error::{AuthError, Error, Result};

const ALREADY_REGISTERED: &str = "Already registered please login";

/// Envelope for every JSON response: `{ success, message, ...data }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// JSON request body; rejected bodies are answered with the failure envelope
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Serialize)]
pub struct GateStatus {
    pub ok: bool,
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::message("healthy"))
}

// Gate probes

/// Reached only when every gate on the route admitted the request
pub async fn gate_ok() -> Json<GateStatus> {
    Json(GateStatus { ok: true })
}

pub async fn protected() -> &'static str {
    "protected route"
}

// Account routes

pub async fn register(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserData>>)> {
    let reg = req.validate()?;

    // Best-effort pre-check; the store constraint is what prevents duplicates
    if state.accounts.find_by_email(&reg.email).await?.is_some() {
        return Err(Error::Conflict(ALREADY_REGISTERED.to_string()));
    }

    let password_hash = state.passwords.hash_blocking(reg.password).await?;
    let account = state
        .accounts
        .insert(NewAccount {
            name: reg.name,
            email: reg.email,
            password_hash,
            phone: reg.phone,
            address: reg.address,
            answer: reg.answer,
        })
        .await
        .map_err(|e| match e {
            Error::Conflict(_) => Error::Conflict(ALREADY_REGISTERED.to_string()),
            other => other,
        })?;

    tracing::info!(account_id = %account.id, "registered account");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "User registered successfully",
            UserData {
                user: account.into(),
            },
        )),
    ))
}

pub async fn login(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginData>>> {
    let (email, password) = req.validate()?;

    let account = state
        .accounts
        .find_by_email(&email)
        .await?
        .ok_or_else(|| Error::NotFound("Email is not registered".to_string()))?;

    let matches = state
        .passwords
        .verify_blocking(password, account.password_hash.clone())
        .await?;
    if !matches {
        tracing::debug!(account_id = %account.id, "login with wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.issue(&account.id)?;
    tracing::info!(account_id = %account.id, "account logged in");

    Ok(Json(ApiResponse::ok(
        "Login successfully",
        LoginData {
            user: account.into(),
            token,
        },
    )))
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<()>>> {
    let (email, answer, new_password) = req.validate()?;

    let account = state
        .accounts
        .find_by_email(&email)
        .await?
        .filter(|account| account.answer == answer)
        .ok_or_else(|| Error::NotFound("Wrong email or Answer".to_string()))?;

    let password_hash = state.passwords.hash_blocking(new_password).await?;
    state
        .accounts
        .update_by_id(&account.id, AccountUpdate::password(password_hash))
        .await?
        .ok_or_else(|| Error::NotFound("Wrong email or Answer".to_string()))?;

    tracing::info!(account_id = %account.id, "password reset");

    Ok(Json(ApiResponse::message("Password reset successfully")))
}

pub async fn update_profile(
    State(state): State<SharedState>,
    identity: Identity,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UpdatedUserData>>> {
    let changes = req.validate()?;

    let password_hash = match changes.password {
        Some(password) => Some(state.passwords.hash_blocking(password).await?),
        None => None,
    };

    let updated = state
        .accounts
        .update_by_id(
            &identity.account_id,
            AccountUpdate {
                name: changes.name,
                password_hash,
                phone: changes.phone,
                address: changes.address,
                role: None,
            },
        )
        .await?
        .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;

    tracing::info!(account_id = %updated.id, "profile updated");

    Ok(Json(ApiResponse::ok(
        "Updated successfully",
        UpdatedUserData {
            updated_user: updated.into(),
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_envelope() {
        let body = serde_json::to_value(ApiResponse::failure("unAuthorized Access")).unwrap();
        assert_eq!(body, json!({ "success": false, "message": "unAuthorized Access" }));
    }

    #[test]
    fn test_data_is_flattened() {
        let body = serde_json::to_value(ApiResponse::ok("hi", GateStatus { ok: true })).unwrap();
        assert_eq!(body, json!({ "success": true, "message": "hi", "ok": true }));
    }
}
