//! Tweet handlers

use super::MessageResponse;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chirp_types::{NewTweet, Tweet, TweetPatch};
use tracing::info;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Tweet>>, ApiError> {
    Ok(Json(state.tweets.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Tweet>, ApiError> {
    Ok(Json(state.tweets.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<NewTweet>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let tweet = state.tweets.create(&req).await?;
    info!(id = tweet.id, "tweet created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("successfully created")),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<TweetPatch>,
) -> Result<Json<Tweet>, ApiError> {
    Ok(Json(state.tweets.update(id, &patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.tweets.delete(id).await?;
    info!(id, "tweet deleted");

    Ok(Json(MessageResponse::new("successfully deleted")))
}

pub async fn user_tweets(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Tweet>>, ApiError> {
    Ok(Json(state.tweets.user_tweets(user_id).await?))
}
