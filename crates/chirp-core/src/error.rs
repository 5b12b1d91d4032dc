//! Error types for Chirp

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChirpError>;

#[derive(Error, Debug)]
pub enum ChirpError {
    #[error("record not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("OTP not found or expired")]
    OtpNotFound,

    #[error("invalid OTP")]
    InvalidOtp,

    #[error("already following")]
    AlreadyFollowing,

    #[error("not following")]
    NotFollowing,

    #[error("database error: {0}")]
    Database(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("password hash error: {0}")]
    PasswordHash(String),
}

impl ChirpError {
    pub fn validation(message: impl Into<String>) -> Self {
        ChirpError::Validation(message.into())
    }
}

impl From<serde_json::Error> for ChirpError {
    fn from(e: serde_json::Error) -> Self {
        ChirpError::Serialization(e.to_string())
    }
}
