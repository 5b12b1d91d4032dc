//! Follower-graph service

use chirp_core::ports::{FollowerStore, UserStore};
use chirp_core::{ChirpError, Result};
use chirp_types::User;
use std::sync::Arc;
use tracing::warn;

pub struct FollowerService {
    users: Arc<dyn UserStore>,
    followers: Arc<dyn FollowerStore>,
}

impl FollowerService {
    pub fn new(users: Arc<dyn UserStore>, followers: Arc<dyn FollowerStore>) -> Self {
        Self { users, followers }
    }

    pub async fn follow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        validate_pair(follower_id, followed_id)?;
        self.check_both_exist(follower_id, followed_id).await?;

        if self.followers.is_following(follower_id, followed_id).await? {
            return Err(ChirpError::AlreadyFollowing);
        }

        self.followers.follow(follower_id, followed_id).await
    }

    pub async fn unfollow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        validate_pair(follower_id, followed_id)?;
        self.check_both_exist(follower_id, followed_id).await?;

        if !self.followers.is_following(follower_id, followed_id).await? {
            return Err(ChirpError::NotFollowing);
        }

        self.followers.unfollow(follower_id, followed_id).await
    }

    pub async fn is_following(&self, follower_id: i64, followed_id: i64) -> Result<bool> {
        validate_pair(follower_id, followed_id)?;
        self.check_both_exist(follower_id, followed_id).await?;
        self.followers.is_following(follower_id, followed_id).await
    }

    pub async fn followers(&self, user_id: i64) -> Result<Vec<User>> {
        validate_id(user_id)?;
        self.users.get_by_id(user_id).await?;
        self.followers.followers(user_id).await
    }

    pub async fn following(&self, user_id: i64) -> Result<Vec<User>> {
        validate_id(user_id)?;
        self.users.get_by_id(user_id).await?;
        self.followers.following(user_id).await
    }

    async fn check_both_exist(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        if let Err(e) = self.users.get_by_id(follower_id).await {
            warn!(follower_id, "follower does not exist");
            return Err(e);
        }
        if let Err(e) = self.users.get_by_id(followed_id).await {
            warn!(followed_id, "followee does not exist");
            return Err(e);
        }
        Ok(())
    }
}

fn validate_pair(follower_id: i64, followed_id: i64) -> Result<()> {
    if follower_id == followed_id {
        return Err(ChirpError::validation(
            "follower and followee IDs cannot be the same",
        ));
    }
    if follower_id < 1 || followed_id < 1 {
        return Err(ChirpError::validation("invalid IDs"));
    }
    Ok(())
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
    use crate::services::test_support::{MemFollowerStore, MemUserStore};
    use chirp_types::NewUser;

    async fn two_users() -> (FollowerService, Arc<MemUserStore>) {
        let users = Arc::new(MemUserStore::new());
        for name in ["alice", "bob"] {
            users
                .insert(
                    &NewUser {
                        first_name: name.to_string(),
                        last_name: "Test".to_string(),
                        email: format!("{name}@example.com"),
                        username: name.to_string(),
                        age: 20,
                        password: "pw".to_string(),
                    },
                    "hash",
                )
                .await
                .unwrap();
        }
        let followers = Arc::new(MemFollowerStore::new(users.clone()));
        (FollowerService::new(users.clone(), followers), users)
    }

    #[tokio::test]
    async fn self_follow_is_rejected() {
        let (svc, _) = two_users().await;

        assert!(matches!(
            svc.follow(1, 1).await,
            Err(ChirpError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn double_follow_is_rejected() {
        let (svc, _) = two_users().await;

        svc.follow(1, 2).await.unwrap();
        assert!(matches!(
            svc.follow(1, 2).await,
            Err(ChirpError::AlreadyFollowing)
        ));
    }

    #[tokio::test]
    async fn unfollow_requires_an_edge() {
        let (svc, _) = two_users().await;

        assert!(matches!(
            svc.unfollow(1, 2).await,
            Err(ChirpError::NotFollowing)
        ));

        svc.follow(1, 2).await.unwrap();
        svc.unfollow(1, 2).await.unwrap();
        assert!(!svc.is_following(1, 2).await.unwrap());
    }

    #[tokio::test]
    async fn follow_requires_both_users_to_exist() {
        let (svc, _) = two_users().await;

        assert!(matches!(
            svc.follow(1, 42).await,
            Err(ChirpError::NotFound)
        ));
        assert!(matches!(
            svc.follow(42, 1).await,
            Err(ChirpError::NotFound)
        ));
    }

    #[tokio::test]
    async fn follower_and_following_lists_resolve_users() {
        let (svc, _) = two_users().await;

        svc.follow(1, 2).await.unwrap();

        let followers = svc.followers(2).await.unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].username, "alice");

        let following = svc.following(1).await.unwrap();
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].username, "bob");
    }
}
