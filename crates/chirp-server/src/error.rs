//! HTTP error mapping
//!
//! Validation and not-found recover as 4xx with the condition name;
//! infrastructure errors become a generic 500 and never leak store
//! internals.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chirp_core::ChirpError;
use serde_json::json;
use tracing::error;

pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<ChirpError> for ApiError {
    fn from(e: ChirpError) -> Self {
        match e {
            ChirpError::NotFound => Self::new(StatusCode::NOT_FOUND, "record not found"),
            ChirpError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message),
            ChirpError::InvalidCredentials => Self::unauthorized("unauthorized"),
            ChirpError::InvalidOtp => Self::unauthorized("invalid OTP"),
            ChirpError::OtpNotFound => Self::unauthorized("OTP not found or expired"),
            ChirpError::AlreadyFollowing => Self::new(StatusCode::CONFLICT, "already following"),
            ChirpError::NotFollowing => Self::new(StatusCode::CONFLICT, "not following"),
            ChirpError::Database(_)
            | ChirpError::Cache(_)
            | ChirpError::Serialization(_)
            | ChirpError::PasswordHash(_) => {
                error!("internal error: {}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
