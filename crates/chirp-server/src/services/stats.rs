//! Engagement-counter service
//!
//! Thin ±1 wrapper over the atomic counter store; counters are created
//! lazily with zero counts on first read.

use chirp_core::ports::StatsStore;
use chirp_core::{ChirpError, Result};
use chirp_types::TweetStats;
use std::sync::Arc;

pub struct StatsService {
    stats: Arc<dyn StatsStore>,
}

impl StatsService {
    pub fn new(stats: Arc<dyn StatsStore>) -> Self {
        Self { stats }
    }

    pub async fn get(&self, tweet_id: i64) -> Result<TweetStats> {
        validate_id(tweet_id)?;
        self.stats.get_or_init(tweet_id).await
    }

    pub async fn add_like(&self, tweet_id: i64) -> Result<()> {
        validate_id(tweet_id)?;
        self.stats.add_likes(tweet_id, 1).await
    }

    pub async fn remove_like(&self, tweet_id: i64) -> Result<()> {
        validate_id(tweet_id)?;
        self.stats.add_likes(tweet_id, -1).await
    }

    pub async fn add_dislike(&self, tweet_id: i64) -> Result<()> {
        validate_id(tweet_id)?;
        self.stats.add_dislikes(tweet_id, 1).await
    }

    pub async fn remove_dislike(&self, tweet_id: i64) -> Result<()> {
        validate_id(tweet_id)?;
        self.stats.add_dislikes(tweet_id, -1).await
    }
}

fn validate_id(id: i64) -> Result<()> {
    if id < 1 {
        return Err(ChirpError::Validation(format!("invalid ID: {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::MemStatsStore;

    #[tokio::test]
    async fn counters_start_at_zero_and_track_deltas() {
        let svc = StatsService::new(Arc::new(MemStatsStore::new()));

        let stats = svc.get(1).await.unwrap();
        assert_eq!((stats.likes, stats.dislikes), (0, 0));

        svc.add_like(1).await.unwrap();
        svc.add_like(1).await.unwrap();
        svc.add_dislike(1).await.unwrap();
        svc.remove_like(1).await.unwrap();

        let stats = svc.get(1).await.unwrap();
        assert_eq!((stats.likes, stats.dislikes), (1, 1));
    }

    #[tokio::test]
    async fn invalid_id_is_rejected() {
        let svc = StatsService::new(Arc::new(MemStatsStore::new()));

        assert!(matches!(
            svc.get(0).await,
            Err(ChirpError::Validation(_))
        ));
    }
}
