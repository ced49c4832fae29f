//! Null cache provider for testing
//!
//! Stores nothing; every read misses. Lets tests and cache-less
//! deployments run the orchestrator unchanged.

use airelay_domain::error::Result;
use airelay_domain::ports::{CacheEntryConfig, CacheProvider};
use async_trait::async_trait;

/// Cache provider that never stores anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCacheProvider;

impl NullCacheProvider {
    /// Create a null cache provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheProvider for NullCacheProvider {
    async fn get_json(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_json(&self, _key: &str, _value: &str, _config: CacheEntryConfig) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}
