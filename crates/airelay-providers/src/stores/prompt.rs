//! In-memory prompt store

use airelay_domain::error::Result;
use airelay_domain::repositories::PromptStore;
use airelay_domain::value_objects::PromptRecord;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-memory tenant prompt store
#[derive(Default)]
pub struct InMemoryPromptStore {
    records: RwLock<Vec<PromptRecord>>,
}

impl InMemoryPromptStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the usage counter for a record, for assertions
    pub async fn usage_count(&self, tenant_id: &str, key: &str, version: u32) -> Option<u64> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.tenant_id == tenant_id && r.key == key && r.version == version)
            .map(|r| r.usage_count)
    }
}

#[async_trait]
impl PromptStore for InMemoryPromptStore {
    async fn find_active(&self, tenant_id: &str, key: &str) -> Result<Option<PromptRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.tenant_id == tenant_id && r.key == key && r.active)
            .max_by_key(|r| r.version)
            .cloned())
    }

    async fn upsert(&self, record: PromptRecord) -> Result<()> {
        let mut records = self.records.write().await;
        if let Some(existing) = records.iter_mut().find(|r| {
            r.tenant_id == record.tenant_id && r.key == record.key && r.version == record.version
        }) {
            *existing = record;
        } else {
            records.push(record);
        }
        Ok(())
    }

    async fn bump_usage(&self, tenant_id: &str, key: &str, version: u32) -> Result<()> {
        let mut records = self.records.write().await;
        if let Some(record) = records
            .iter_mut()
            .find(|r| r.tenant_id == tenant_id && r.key == key && r.version == version)
        {
            record.usage_count += 1;
        }
        Ok(())
    }
}
