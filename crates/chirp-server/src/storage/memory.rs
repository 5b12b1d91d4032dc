//! In-memory key-value store using DashMap
//!
//! Implements the same `KeyValue` port as the Redis adapter so the cache
//! and auth services can run against it in tests.

use async_trait::async_trait;
use chirp_core::ports::KeyValue;
use chirp_core::Result;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct MemoryKv {
    data: Arc<DashMap<String, Entry>>,
}

struct Entry {
    value: String,
    expires_at: Instant,
}

impl MemoryKv {
    pub fn new() -> Self {
        let kv = Self {
            data: Arc::new(DashMap::new()),
        };

        // Expired entries are also dropped lazily on get; the sweep just
        // bounds memory for keys nobody reads again.
        kv.start_sweep_task();

        kv
    }

    fn start_sweep_task(&self) {
        let data = self.data.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;

                let now = Instant::now();
                let expired: Vec<String> = data
                    .iter()
                    .filter(|entry| now > entry.expires_at)
                    .map(|entry| entry.key().clone())
                    .collect();

                for key in expired {
                    data.remove(&key);
                }
            }
        });
    }
}

impl Default for MemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValue for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).and_then(|entry| {
            if Instant::now() > entry.expires_at {
                drop(entry);
                self.data.remove(key);
                return None;
            }
            Some(entry.value.clone())
        }))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.data.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_basic_operations() {
        let kv = MemoryKv::new();

        kv.set_ex("key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(kv.get("key1").await.unwrap(), Some("value1".to_string()));

        assert_eq!(kv.get("nonexistent").await.unwrap(), None);

        kv.del("key1").await.unwrap();
        assert_eq!(kv.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let kv = MemoryKv::new();

        kv.del("missing").await.unwrap();
        kv.del("missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let kv = MemoryKv::new();

        kv.set_ex("key1", "value1", Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(kv.get("key1").await.unwrap(), Some("value1".to_string()));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(kv.get("key1").await.unwrap(), None);
    }
}
