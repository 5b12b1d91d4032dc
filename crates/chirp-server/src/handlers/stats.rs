//! Engagement-counter handlers

use super::MessageResponse;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use chirp_types::TweetStats;

pub async fn get(
    State(state): State<AppState>,
    Path(tweet_id): Path<i64>,
) -> Result<Json<TweetStats>, ApiError> {
    Ok(Json(state.stats.get(tweet_id).await?))
}

pub async fn add_like(
    State(state): State<AppState>,
    Path(tweet_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.stats.add_like(tweet_id).await?;
    Ok(Json(MessageResponse::new("like added")))
}

pub async fn remove_like(
    State(state): State<AppState>,
    Path(tweet_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.stats.remove_like(tweet_id).await?;
    Ok(Json(MessageResponse::new("like removed")))
}

pub async fn add_dislike(
    State(state): State<AppState>,
    Path(tweet_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.stats.add_dislike(tweet_id).await?;
    Ok(Json(MessageResponse::new("dislike added")))
}

pub async fn remove_dislike(
    State(state): State<AppState>,
    Path(tweet_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.stats.remove_dislike(tweet_id).await?;
    Ok(Json(MessageResponse::new("dislike removed")))
}
