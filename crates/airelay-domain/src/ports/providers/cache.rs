//! Cache Provider Port
//!
//! Port for cache backend providers. Supports in-memory (Moka) and null
//! providers; the research response cache is built on top of this
//! interface in the infrastructure layer.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default TTL for cache entries (24 hours)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;

/// Cache Entry Configuration
///
/// Configures how a cache entry should be stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntryConfig {
    /// Time to live for the cache entry
    pub ttl: Option<Duration>,
}

impl CacheEntryConfig {
    /// Create a new cache entry config with the default TTL
    pub fn new() -> Self {
        Self {
            ttl: Some(Duration::from_secs(DEFAULT_CACHE_TTL_SECS)),
        }
    }

    /// Set the TTL for the cache entry
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Get the effective TTL, falling back to the default
    pub fn effective_ttl(&self) -> Duration {
        self.ttl
            .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }
}

impl Default for CacheEntryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Port for cache backends
#[async_trait]
pub trait CacheProvider: Send + Sync {
    /// Get a JSON value by key
    async fn get_json(&self, key: &str) -> Result<Option<String>>;

    /// Store a JSON value under a key
    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()>;

    /// Delete a key, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Remove every entry
    async fn clear(&self) -> Result<()>;
}
