//! Follower-graph handlers

use super::MessageResponse;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use chirp_types::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    follower_id: i64,
    followed_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct IsFollowingParams {
    follower_id: i64,
    followed_id: i64,
}

#[derive(Debug, Serialize)]
pub struct IsFollowingResponse {
    is_following: bool,
}

pub async fn follow(
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .followers
        .follow(req.follower_id, req.followed_id)
        .await?;

    Ok(Json(MessageResponse::new("successfully followed")))
}

pub async fn unfollow(
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .followers
        .unfollow(req.follower_id, req.followed_id)
        .await?;

    Ok(Json(MessageResponse::new("successfully unfollowed")))
}

pub async fn followers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.followers.followers(id).await?))
}

pub async fn following(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.followers.following(id).await?))
}

pub async fn is_following(
    State(state): State<AppState>,
    Query(params): Query<IsFollowingParams>,
) -> Result<Json<IsFollowingResponse>, ApiError> {
    let is_following = state
        .followers
        .is_following(params.follower_id, params.followed_id)
        .await?;

    Ok(Json(IsFollowingResponse { is_following }))
}
