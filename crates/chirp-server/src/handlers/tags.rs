//! Tag handlers

use super::MessageResponse;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chirp_types::Tag;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AddTagRequest {
    tag_id: i64,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.tags.list().await?))
}

pub async fn add_tag(
    State(state): State<AppState>,
    Path(tweet_id): Path<i64>,
    Json(req): Json<AddTagRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.tags.add_tag(tweet_id, req.tag_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("tag added")),
    ))
}

pub async fn tweet_tags(
    State(state): State<AppState>,
    Path(tweet_id): Path<i64>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.tags.tweet_tags(tweet_id).await?))
}
