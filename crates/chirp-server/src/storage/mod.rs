//! Storage layer
//!
//! PostgreSQL (via sqlx) for the relational stores, Redis for the
//! key-value store. `MemoryKv` is a drop-in key-value substitute backed
//! by DashMap, used by the service tests.

pub mod db;
pub mod memory;
pub mod redis;

pub use db::Database;
pub use memory::MemoryKv;
pub use redis::RedisKv;
