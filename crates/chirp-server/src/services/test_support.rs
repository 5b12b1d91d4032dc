//! In-memory store doubles for service tests
//!
//! Each double implements the corresponding port over plain collections.
//! `RecordingTweetStore` counts `list_all` calls so cache tests can prove
//! the fast path never touches the relational store.

use async_trait::async_trait;
use chirp_core::ports::{FollowerStore, StatsStore, TweetStore, UserStore};
use chirp_core::{ChirpError, Result};
use chirp_types::{NewTweet, NewUser, Tweet, TweetStats, User};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct RecordingTweetStore {
    rows: Mutex<Vec<Tweet>>,
    next_id: AtomicUsize,
    list_calls: AtomicUsize,
}

impl RecordingTweetStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `list_all` hit this store.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Current store content, the authority the cache must agree with.
    pub fn snapshot(&self) -> Vec<Tweet> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl TweetStore for RecordingTweetStore {
    async fn insert(&self, tweet: &NewTweet) -> Result<Tweet> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        let now = Utc::now();
        let row = Tweet {
            id,
            title: tweet.title.clone(),
            content: tweet.content.clone(),
            topic: tweet.topic.clone(),
            user_id: tweet.user_id,
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> Result<Tweet> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(ChirpError::NotFound)
    }

    async fn list_all(&self) -> Result<Vec<Tweet>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn update(&self, id: i64, patch: &chirp_types::TweetPatch) -> Result<Tweet> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ChirpError::NotFound)?;
        if let Some(title) = &patch.title {
            row.title = title.clone();
        }
        if let Some(content) = &patch.content {
            row.content = content.clone();
        }
        if let Some(topic) = &patch.topic {
            row.topic = topic.clone();
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.id != id);
        if rows.len() == before {
            return Err(ChirpError::NotFound);
        }
        Ok(())
    }

    async fn user_tweets(&self, user_id: i64) -> Result<Vec<Tweet>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemUserStore {
    rows: Mutex<Vec<User>>,
    next_id: AtomicUsize,
}

impl MemUserStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }
}

#[async_trait]
impl UserStore for MemUserStore {
    async fn insert(&self, user: &NewUser, password_hash: &str) -> Result<User> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(ChirpError::validation("username or email already taken"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        let now = Utc::now();
        let row = User {
            id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            age: user.age,
            password_hash: password_hash.to_string(),
            first_login: true,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn get_by_id(&self, id: i64) -> Result<User> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(ChirpError::NotFound)
    }

    async fn get_by_username(&self, username: &str) -> Result<User> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(ChirpError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(ChirpError::NotFound)
    }

    async fn is_first_login(&self, id: i64) -> Result<bool> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.first_login)
            .ok_or(ChirpError::NotFound)
    }

    async fn clear_first_login(&self, id: i64) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ChirpError::NotFound)?;
        row.first_login = false;
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

pub struct MemFollowerStore {
    edges: Mutex<Vec<(i64, i64)>>,
    users: Arc<MemUserStore>,
}

impl MemFollowerStore {
    pub fn new(users: Arc<MemUserStore>) -> Self {
        Self {
            edges: Mutex::new(Vec::new()),
            users,
        }
    }
}

#[async_trait]
impl FollowerStore for MemFollowerStore {
    async fn follow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        let mut edges = self.edges.lock().unwrap();
        if edges.contains(&(follower_id, followed_id)) {
            return Err(ChirpError::AlreadyFollowing);
        }
        edges.push((follower_id, followed_id));
        Ok(())
    }

    async fn unfollow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        let mut edges = self.edges.lock().unwrap();
        let before = edges.len();
        edges.retain(|e| *e != (follower_id, followed_id));
        if edges.len() == before {
            return Err(ChirpError::NotFound);
        }
        Ok(())
    }

    async fn is_following(&self, follower_id: i64, followed_id: i64) -> Result<bool> {
        Ok(self
            .edges
            .lock()
            .unwrap()
            .contains(&(follower_id, followed_id)))
    }

    async fn followers(&self, user_id: i64) -> Result<Vec<User>> {
        let ids: Vec<i64> = self
            .edges
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, followed)| *followed == user_id)
            .map(|(follower, _)| *follower)
            .collect();
        let mut users = Vec::new();
        for id in ids {
            users.push(self.users.get_by_id(id).await?);
        }
        Ok(users)
    }

    async fn following(&self, user_id: i64) -> Result<Vec<User>> {
        let ids: Vec<i64> = self
            .edges
            .lock()
            .unwrap()
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .map(|(_, followed)| *followed)
            .collect();
        let mut users = Vec::new();
        for id in ids {
            users.push(self.users.get_by_id(id).await?);
        }
        Ok(users)
    }
}

#[derive(Default)]
pub struct MemStatsStore {
    docs: Mutex<HashMap<i64, TweetStats>>,
}

impl MemStatsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsStore for MemStatsStore {
    async fn get_or_init(&self, tweet_id: i64) -> Result<TweetStats> {
        let mut docs = self.docs.lock().unwrap();
        Ok(docs
            .entry(tweet_id)
            .or_insert_with(|| TweetStats {
                tweet_id,
                likes: 0,
                dislikes: 0,
                last_update: Utc::now(),
            })
            .clone())
    }

    async fn add_likes(&self, tweet_id: i64, delta: i64) -> Result<()> {
        // Increments on an absent document are no-ops, matching the update
        // contract of the real store.
        if let Some(doc) = self.docs.lock().unwrap().get_mut(&tweet_id) {
            doc.likes += delta;
            doc.last_update = Utc::now();
        }
        Ok(())
    }

    async fn add_dislikes(&self, tweet_id: i64, delta: i64) -> Result<()> {
        if let Some(doc) = self.docs.lock().unwrap().get_mut(&tweet_id) {
            doc.dislikes += delta;
            doc.last_update = Utc::now();
        }
        Ok(())
    }
}
