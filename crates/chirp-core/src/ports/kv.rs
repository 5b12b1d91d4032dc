//! Key-value store port

use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// TTL-capable key-value store.
///
/// Absence and expiry are indistinguishable to callers: both surface as
/// `Ok(None)` from `get`. `del` on an absent key is not an error.
#[async_trait]
pub trait KeyValue: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
    async fn del(&self, key: &str) -> Result<()>;
}
