//! Tweet, tag, and engagement-counter types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published tweet.
///
/// This struct is also the wire shape of the cached tweet-list snapshot,
/// so its field set is part of the cache serialization contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub topic: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Tags are loaded on demand through the tag endpoints; list and cache
    /// snapshots carry an empty set.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Payload for creating a tweet. The store assigns id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTweet {
    pub title: String,
    pub content: String,
    pub topic: String,
    pub user_id: i64,
}

/// Partial tweet update: only the provided fields overwrite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TweetPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Per-tweet like/dislike counters, one document per tweet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetStats {
    pub tweet_id: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub last_update: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tweet_wire_shape_is_stable() {
        let tweet = Tweet {
            id: 1,
            title: "t".into(),
            content: "c".into(),
            topic: "general".into(),
            user_id: 7,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            tags: vec![],
        };
        let value = serde_json::to_value(&tweet).unwrap();
        let object = value.as_object().unwrap();
        for field in [
            "id",
            "title",
            "content",
            "topic",
            "user_id",
            "created_at",
            "updated_at",
            "tags",
        ] {
            assert!(object.contains_key(field), "missing field {field}");
        }
    }

    #[test]
    fn tweet_deserializes_without_tags() {
        let json = r#"{
            "id": 3,
            "title": "t",
            "content": "c",
            "topic": "general",
            "user_id": 1,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let tweet: Tweet = serde_json::from_str(json).unwrap();
        assert!(tweet.tags.is_empty());
    }
}
