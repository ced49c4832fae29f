//! Tenant prompt repository

use crate::error::Result;
use crate::value_objects::PromptRecord;
use async_trait::async_trait;

/// Repository for tenant-scoped versioned prompt templates
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Find the highest-versioned active record for a tenant and key
    async fn find_active(&self, tenant_id: &str, key: &str) -> Result<Option<PromptRecord>>;

    /// Insert or replace a prompt record
    async fn upsert(&self, record: PromptRecord) -> Result<()>;

    /// Increment the usage counter for a record, best-effort
    async fn bump_usage(&self, tenant_id: &str, key: &str, version: u32) -> Result<()>;
}
