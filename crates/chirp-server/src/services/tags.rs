//! Tag service

use chirp_core::ports::TagStore;
use chirp_core::{ChirpError, Result};
use chirp_types::Tag;
use std::sync::Arc;

pub struct TagService {
    tags: Arc<dyn TagStore>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagStore>) -> Self {
        Self { tags }
    }

    pub async fn add_tag(&self, tweet_id: i64, tag_id: i64) -> Result<()> {
        validate_id(tweet_id)?;
        validate_id(tag_id)?;
        self.tags.add_tag(tweet_id, tag_id).await
    }

    pub async fn tweet_tags(&self, tweet_id: i64) -> Result<Vec<Tag>> {
        validate_id(tweet_id)?;
        self.tags.tweet_tags(tweet_id).await
    }

    pub async fn list(&self) -> Result<Vec<Tag>> {
        self.tags.list_tags().await
    }
}

fn validate_id(id: i64) -> Result<()> {
    if id < 1 {
        return Err(ChirpError::Validation(format!("invalid ID: {id}")));
    }
    Ok(())
}
