//! User and authentication handlers

use super::MessageResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::services::AuthOutcome;
use crate::AppState;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chirp_core::ChirpError;
use chirp_types::{NewUser, User};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct TwoFactorRequest {
    username: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    email: String,
    otp: String,
}

/// The `token` field carries the session token, or, when `otp_required`
/// is set, the one-time code routed out of band.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    message: String,
    token: String,
    otp_required: bool,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let user = state.auth.register(&req).await?;
    info!(id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("successfully registered")),
    ))
}

pub async fn authorize(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let outcome = state.auth.authorize(&req.username, &req.password).await?;

    let response = match outcome {
        AuthOutcome::Session { token } => AuthResponse {
            message: "successfully authorized".to_string(),
            token,
            otp_required: false,
        },
        AuthOutcome::OtpChallenge { code } => AuthResponse {
            message: "two-factor verification required".to_string(),
            token: code,
            otp_required: true,
        },
    };

    Ok(Json(response))
}

pub async fn authorize_2fa(
    State(state): State<AppState>,
    Json(req): Json<TwoFactorRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    // Unknown usernames come back as a generic 401 so this endpoint cannot
    // be used to enumerate accounts.
    let code = state
        .auth
        .authorize_2fa(&req.username)
        .await
        .map_err(|e| match e {
            ChirpError::NotFound => ApiError::unauthorized("unauthorized"),
            other => ApiError::from(other),
        })?;

    Ok(Json(AuthResponse {
        message: "two-factor verification required".to_string(),
        token: code,
        otp_required: true,
    }))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let token = state.auth.verify_otp(&req.email, &req.otp).await?;

    Ok(Json(AuthResponse {
        message: "successfully authorized".to_string(),
        token,
        otp_required: false,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("token is required"))?;
    let token = crate::extractors::auth::bearer_token(header);

    state.auth.logout(token).await?;

    Ok(Json(MessageResponse::new("logout successful")))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.auth.list_users().await?))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.auth.get_user(auth.user_id).await?))
}
