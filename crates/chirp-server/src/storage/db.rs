//! PostgreSQL storage layer

use async_trait::async_trait;
use chirp_core::ports::{FollowerStore, StatsStore, TagStore, TweetStore, UserStore};
use chirp_core::{ChirpError, Result};
use chirp_types::{NewTweet, NewUser, Tag, Tweet, TweetPatch, TweetStats, User};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub struct Database {
    pool: PgPool,
}

fn map_err(e: sqlx::Error) -> ChirpError {
    match e {
        sqlx::Error::RowNotFound => ChirpError::NotFound,
        other => ChirpError::Database(other.to_string()),
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        tracing::info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| ChirpError::Database(format!("failed to connect: {e}")))?;

        tracing::info!("PostgreSQL connection established, running migrations...");

        Self::run_migrations(&pool).await?;

        tracing::info!("Database initialization complete");

        Ok(Self { pool })
    }

    async fn run_migrations(pool: &PgPool) -> Result<()> {
        // Users table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                username TEXT UNIQUE NOT NULL,
                age INT NOT NULL,
                password_hash TEXT NOT NULL,
                first_login BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(map_err)?;

        // Tweets table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tweets (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                topic TEXT NOT NULL DEFAULT '',
                user_id BIGINT NOT NULL REFERENCES users(id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(map_err)?;

        // Tags and the tweet<->tag association
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tags (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(map_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tweet_tags (
                tweet_id BIGINT NOT NULL REFERENCES tweets(id) ON DELETE CASCADE,
                tag_id BIGINT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (tweet_id, tag_id)
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(map_err)?;

        // Follower edges
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS followers (
                follower_id BIGINT NOT NULL REFERENCES users(id),
                followed_id BIGINT NOT NULL REFERENCES users(id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (follower_id, followed_id)
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(map_err)?;

        // Engagement counters, one row per tweet
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tweet_stats (
                tweet_id BIGINT PRIMARY KEY,
                likes BIGINT NOT NULL DEFAULT 0,
                dislikes BIGINT NOT NULL DEFAULT 0,
                last_update TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(map_err)?;

        Ok(())
    }
}

const TWEET_COLUMNS: &str = "id, title, content, topic, user_id, created_at, updated_at";

#[async_trait]
impl TweetStore for Database {
    async fn insert(&self, tweet: &NewTweet) -> Result<Tweet> {
        let row: TweetRow = sqlx::query_as(
            r#"
            INSERT INTO tweets (title, content, topic, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, topic, user_id, created_at, updated_at
            "#,
        )
        .bind(&tweet.title)
        .bind(&tweet.content)
        .bind(&tweet.topic)
        .bind(tweet.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(row.into())
    }

    async fn get(&self, id: i64) -> Result<Tweet> {
        let row: Option<TweetRow> = sqlx::query_as(&format!(
            "SELECT {TWEET_COLUMNS} FROM tweets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        row.map(Into::into).ok_or(ChirpError::NotFound)
    }

    async fn list_all(&self) -> Result<Vec<Tweet>> {
        let rows: Vec<TweetRow> = sqlx::query_as(&format!(
            "SELECT {TWEET_COLUMNS} FROM tweets ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, patch: &TweetPatch) -> Result<Tweet> {
        let row: Option<TweetRow> = sqlx::query_as(
            r#"
            UPDATE tweets
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                topic = COALESCE($4, topic),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, content, topic, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.content)
        .bind(&patch.topic)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        row.map(Into::into).ok_or(ChirpError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;

        if result.rows_affected() == 0 {
            return Err(ChirpError::NotFound);
        }
        Ok(())
    }

    async fn user_tweets(&self, user_id: i64) -> Result<Vec<Tweet>> {
        let rows: Vec<TweetRow> = sqlx::query_as(&format!(
            "SELECT {TWEET_COLUMNS} FROM tweets WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, username, age, password_hash, first_login, \
     created_at, updated_at";

#[async_trait]
impl UserStore for Database {
    async fn insert(&self, user: &NewUser, password_hash: &str) -> Result<User> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (first_name, last_name, email, username, age, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, email, username, age, password_hash,
                      first_login, created_at, updated_at
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.username)
        .bind(user.age)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ChirpError::validation("username or email already taken")
            } else {
                map_err(e)
            }
        })?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: i64) -> Result<User> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_err)?;

        row.map(Into::into).ok_or(ChirpError::NotFound)
    }

    async fn get_by_username(&self, username: &str) -> Result<User> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        row.map(Into::into).ok_or(ChirpError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        row.map(Into::into).ok_or(ChirpError::NotFound)
    }

    async fn is_first_login(&self, id: i64) -> Result<bool> {
        let row: Option<(bool,)> =
            sqlx::query_as("SELECT first_login FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_err)?;

        row.map(|(first_login,)| first_login)
            .ok_or(ChirpError::NotFound)
    }

    async fn clear_first_login(&self, id: i64) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET first_login = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        if result.rows_affected() == 0 {
            return Err(ChirpError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(map_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TagStore for Database {
    async fn add_tag(&self, tweet_id: i64, tag_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO tweet_tags (tweet_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(tweet_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(())
    }

    async fn tweet_tags(&self, tweet_id: i64) -> Result<Vec<Tag>> {
        let rows: Vec<TagRow> = sqlx::query_as(
            r#"
            SELECT t.id, t.name
            FROM tags t
            JOIN tweet_tags tt ON t.id = tt.tag_id
            WHERE tt.tweet_id = $1
            ORDER BY t.id
            "#,
        )
        .bind(tweet_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let rows: Vec<TagRow> = sqlx::query_as("SELECT id, name FROM tags ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

// Qualified column list for joins where `created_at` would be ambiguous.
const USER_COLUMNS_QUALIFIED: &str =
    "u.id, u.first_name, u.last_name, u.email, u.username, u.age, u.password_hash, \
     u.first_login, u.created_at, u.updated_at";

#[async_trait]
impl FollowerStore for Database {
    async fn follow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        sqlx::query("INSERT INTO followers (follower_id, followed_id) VALUES ($1, $2)")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ChirpError::AlreadyFollowing
                } else {
                    map_err(e)
                }
            })?;

        Ok(())
    }

    async fn unfollow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM followers WHERE follower_id = $1 AND followed_id = $2",
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        if result.rows_affected() == 0 {
            return Err(ChirpError::NotFound);
        }
        Ok(())
    }

    async fn is_following(&self, follower_id: i64, followed_id: i64) -> Result<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM followers WHERE follower_id = $1 AND followed_id = $2)",
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(exists)
    }

    async fn followers(&self, user_id: i64) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            r#"
            SELECT {USER_COLUMNS_QUALIFIED}
            FROM users u
            JOIN followers f ON u.id = f.follower_id
            WHERE f.followed_id = $1
            ORDER BY u.id
            "#,
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn following(&self, user_id: i64) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            r#"
            SELECT {USER_COLUMNS_QUALIFIED}
            FROM users u
            JOIN followers f ON u.id = f.followed_id
            WHERE f.follower_id = $1
            ORDER BY u.id
            "#,
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl StatsStore for Database {
    async fn get_or_init(&self, tweet_id: i64) -> Result<TweetStats> {
        let row: Option<StatsRow> = sqlx::query_as(
            "SELECT tweet_id, likes, dislikes, last_update FROM tweet_stats WHERE tweet_id = $1",
        )
        .bind(tweet_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        // Lazily create a zeroed counter row; a concurrent creator wins the
        // conflict and the re-read returns its row.
        sqlx::query("INSERT INTO tweet_stats (tweet_id) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(tweet_id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;

        let row: StatsRow = sqlx::query_as(
            "SELECT tweet_id, likes, dislikes, last_update FROM tweet_stats WHERE tweet_id = $1",
        )
        .bind(tweet_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(row.into())
    }

    async fn add_likes(&self, tweet_id: i64, delta: i64) -> Result<()> {
        sqlx::query(
            "UPDATE tweet_stats SET likes = likes + $2, last_update = NOW() WHERE tweet_id = $1",
        )
        .bind(tweet_id)
        .bind(delta)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(())
    }

    async fn add_dislikes(&self, tweet_id: i64, delta: i64) -> Result<()> {
        sqlx::query(
            "UPDATE tweet_stats SET dislikes = dislikes + $2, last_update = NOW() WHERE tweet_id = $1",
        )
        .bind(tweet_id)
        .bind(delta)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(())
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct TweetRow {
    id: i64,
    title: String,
    content: String,
    topic: String,
    user_id: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<TweetRow> for Tweet {
    fn from(r: TweetRow) -> Self {
        Tweet {
            id: r.id,
            title: r.title,
            content: r.content,
            topic: r.topic,
            user_id: r.user_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
            tags: Vec::new(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    username: String,
    age: i32,
    password_hash: String,
    first_login: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            username: r.username,
            age: r.age,
            password_hash: r.password_hash,
            first_login: r.first_login,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TagRow {
    id: i64,
    name: String,
}

impl From<TagRow> for Tag {
    fn from(r: TagRow) -> Self {
        Tag {
            id: r.id,
            name: r.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    tweet_id: i64,
    likes: i64,
    dislikes: i64,
    last_update: chrono::DateTime<chrono::Utc>,
}

impl From<StatsRow> for TweetStats {
    fn from(r: StatsRow) -> Self {
        TweetStats {
            tweet_id: r.tweet_id,
            likes: r.likes,
            dislikes: r.dislikes,
            last_update: r.last_update,
        }
    }
}
