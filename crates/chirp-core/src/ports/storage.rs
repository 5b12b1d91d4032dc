//! Storage ports for persistence

use crate::Result;
use async_trait::async_trait;
use chirp_types::{NewTweet, NewUser, Tag, Tweet, TweetPatch, TweetStats, User};

/// Tweet store (relational)
///
/// Lookup misses surface as [`crate::ChirpError::NotFound`].
#[async_trait]
pub trait TweetStore: Send + Sync {
    /// Insert a row; the store assigns id and timestamps.
    async fn insert(&self, tweet: &NewTweet) -> Result<Tweet>;
    async fn get(&self, id: i64) -> Result<Tweet>;
    /// Full collection, ordered by id.
    async fn list_all(&self) -> Result<Vec<Tweet>>;
    /// Partial update: only the patch's `Some` fields overwrite.
    async fn update(&self, id: i64, patch: &TweetPatch) -> Result<Tweet>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn user_tweets(&self, user_id: i64) -> Result<Vec<Tweet>>;
}

/// User store
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &NewUser, password_hash: &str) -> Result<User>;
    async fn get_by_id(&self, id: i64) -> Result<User>;
    async fn get_by_username(&self, username: &str) -> Result<User>;
    async fn get_by_email(&self, email: &str) -> Result<User>;
    async fn is_first_login(&self, id: i64) -> Result<bool>;
    /// Flip the first-login flag off after a successful 2FA verification.
    async fn clear_first_login(&self, id: i64) -> Result<()>;
    async fn list(&self) -> Result<Vec<User>>;
}

/// Tag store
#[async_trait]
pub trait TagStore: Send + Sync {
    async fn add_tag(&self, tweet_id: i64, tag_id: i64) -> Result<()>;
    async fn tweet_tags(&self, tweet_id: i64) -> Result<Vec<Tag>>;
    async fn list_tags(&self) -> Result<Vec<Tag>>;
}

/// Follower-graph store
#[async_trait]
pub trait FollowerStore: Send + Sync {
    async fn follow(&self, follower_id: i64, followed_id: i64) -> Result<()>;
    /// Removing an absent edge surfaces not-found.
    async fn unfollow(&self, follower_id: i64, followed_id: i64) -> Result<()>;
    async fn is_following(&self, follower_id: i64, followed_id: i64) -> Result<bool>;
    async fn followers(&self, user_id: i64) -> Result<Vec<User>>;
    async fn following(&self, user_id: i64) -> Result<Vec<User>>;
}

/// Engagement-counter store (document-style: one counter doc per tweet)
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Fetch the counters for a tweet, creating a zeroed document if absent.
    async fn get_or_init(&self, tweet_id: i64) -> Result<TweetStats>;
    /// Atomic in-store increment, never read-modify-write.
    async fn add_likes(&self, tweet_id: i64, delta: i64) -> Result<()>;
    async fn add_dislikes(&self, tweet_id: i64, delta: i64) -> Result<()>;
}
