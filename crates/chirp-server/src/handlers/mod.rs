//! HTTP handlers

pub mod followers;
pub mod stats;
pub mod tags;
pub mod tweets;
pub mod users;

use serde::Serialize;

/// Plain confirmation body shared by the mutation endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub async fn health() -> &'static str {
    "OK"
}
