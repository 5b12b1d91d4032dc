//! Tweet service: read-through, write-invalidating list cache
//!
//! The full tweet collection is cached as one JSON snapshot under a single
//! key. Reads go through the cache; every mutation deletes the snapshot and
//! eagerly rebuilds it from the relational store so the next read stays
//! warm. Only the full listing is cache-accelerated; point lookups and
//! per-user queries always hit the relational store.

use chirp_core::ports::{KeyValue, TweetStore};
use chirp_core::{ChirpError, Result};
use chirp_types::{NewTweet, Tweet, TweetPatch};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Collection-level cache key for the full tweet list.
pub const TWEET_LIST_KEY: &str = "tweets:list";

pub struct TweetService {
    tweets: Arc<dyn TweetStore>,
    cache: Arc<dyn KeyValue>,
    cache_ttl: Duration,
}

impl TweetService {
    pub fn new(tweets: Arc<dyn TweetStore>, cache: Arc<dyn KeyValue>, cache_ttl: Duration) -> Self {
        Self {
            tweets,
            cache,
            cache_ttl,
        }
    }

    /// Full tweet listing, served from the cache when possible.
    ///
    /// Any cache problem (absent key, expired entry, unreachable store,
    /// corrupted value) falls through to the relational store; a list read
    /// only fails if the relational store does.
    pub async fn list(&self) -> Result<Vec<Tweet>> {
        match self.cache.get(TWEET_LIST_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Tweet>>(&raw) {
                Ok(tweets) => {
                    debug!("tweet list cache hit");
                    return Ok(tweets);
                }
                Err(e) => warn!("discarding corrupted tweet list cache entry: {}", e),
            },
            Ok(None) => debug!("tweet list cache miss"),
            Err(e) => warn!("tweet list cache read failed, falling back: {}", e),
        }

        let tweets = self.tweets.list_all().await?;

        // Populating the cache is best effort on the read path.
        if let Err(e) = self.store_snapshot(&tweets).await {
            warn!("failed to populate tweet list cache: {}", e);
        }

        Ok(tweets)
    }

    pub async fn create(&self, tweet: &NewTweet) -> Result<Tweet> {
        if tweet.title.is_empty() {
            return Err(ChirpError::validation("title cannot be empty"));
        }
        if tweet.content.is_empty() {
            return Err(ChirpError::validation("content cannot be empty"));
        }
        if tweet.user_id < 1 {
            return Err(ChirpError::validation("user ID cannot be empty"));
        }

        // Store write first: a failed write must leave the cache untouched.
        let created = self.tweets.insert(tweet).await?;
        self.invalidate_and_rebuild().await?;
        Ok(created)
    }

    pub async fn update(&self, id: i64, patch: &TweetPatch) -> Result<Tweet> {
        validate_id(id)?;

        let updated = self.tweets.update(id, patch).await?;
        self.invalidate_and_rebuild().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        validate_id(id)?;

        self.tweets.delete(id).await?;
        self.invalidate_and_rebuild().await?;
        Ok(())
    }

    /// Point lookup; intentionally bypasses the cache.
    pub async fn get(&self, id: i64) -> Result<Tweet> {
        validate_id(id)?;
        self.tweets.get(id).await
    }

    /// Per-user listing; intentionally bypasses the cache.
    pub async fn user_tweets(&self, user_id: i64) -> Result<Vec<Tweet>> {
        validate_id(user_id)?;
        self.tweets.user_tweets(user_id).await
    }

    /// Wholesale delete, then eager rebuild from the relational store.
    ///
    /// Rebuild errors propagate wrapped; a failed rebuild after a committed
    /// write self-heals on the next `list` miss.
    async fn invalidate_and_rebuild(&self) -> Result<()> {
        self.cache
            .del(TWEET_LIST_KEY)
            .await
            .map_err(|e| ChirpError::Cache(format!("failed to delete tweet list cache: {e}")))?;
        self.rebuild_cache().await
    }

    async fn rebuild_cache(&self) -> Result<()> {
        let tweets = self.tweets.list_all().await?;
        self.store_snapshot(&tweets)
            .await
            .map_err(|e| ChirpError::Cache(format!("failed to rebuild tweet list cache: {e}")))
    }

    async fn store_snapshot(&self, tweets: &[Tweet]) -> Result<()> {
        let raw = serde_json::to_string(tweets)?;
        self.cache.set_ex(TWEET_LIST_KEY, &raw, self.cache_ttl).await
    }
}

fn validate_id(id: i64) -> Result<()> {
    if id < 1 {
        return Err(ChirpError::Validation(format!("invalid ID: {id}")));
    }
    Ok(())
}
