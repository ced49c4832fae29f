//! Moka in-memory cache provider
//!
//! High-performance, concurrent in-memory cache implementation using Moka.
//! Capacity and TTL are fixed at construction; the research response cache
//! configures the TTL from application config.

use airelay_domain::error::Result;
use airelay_domain::ports::{CacheEntryConfig, CacheProvider};
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

/// Default maximum number of cached entries
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Moka-based cache provider
#[derive(Clone)]
pub struct MokaCacheProvider {
    cache: Cache<String, String>,
}

impl MokaCacheProvider {
    /// Create a provider with the default capacity and no TTL
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().max_capacity(DEFAULT_MAX_CAPACITY).build(),
        }
    }

    /// Create a provider with explicit capacity and TTL
    pub fn with_config(max_capacity: u64, time_to_live: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(time_to_live)
                .build(),
        }
    }
}

impl Default for MokaCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheProvider for MokaCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.get(key).await)
    }

    async fn set_json(&self, key: &str, value: &str, _config: CacheEntryConfig) -> Result<()> {
        // TTL is cache-wide, fixed at construction
        self.cache.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        Ok(())
    }
}
