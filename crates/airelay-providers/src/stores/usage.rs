//! In-memory usage ledger
//!
//! Append-only vector of usage facts behind an async RwLock. An outage
//! toggle lets tests exercise the usage meter's fail-open behavior.

use airelay_domain::error::{Error, Result};
use airelay_domain::repositories::UsageStore;
use airelay_domain::value_objects::{UsagePeriod, UsageRecord, UsageSummary, UsageTotals};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory append-only usage store
#[derive(Default)]
pub struct InMemoryUsageStore {
    records: RwLock<Vec<UsageRecord>>,
    unavailable: AtomicBool,
}

impl InMemoryUsageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a storage outage: every operation fails until cleared
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of all recorded facts, for assertions
    pub async fn records(&self) -> Vec<UsageRecord> {
        self.records.read().await.clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::storage("usage store unavailable"));
        }
        Ok(())
    }

    fn in_period(record: &UsageRecord, period: UsagePeriod) -> bool {
        record.recorded_at >= period.start && record.recorded_at < period.end
    }
}

#[async_trait]
impl UsageStore for InMemoryUsageStore {
    async fn append(&self, record: UsageRecord) -> Result<()> {
        self.check_available()?;
        self.records.write().await.push(record);
        Ok(())
    }

    async fn totals(&self, tenant_id: &str, period: UsagePeriod) -> Result<UsageTotals> {
        self.check_available()?;
        let records = self.records.read().await;
        let mut totals = UsageTotals::default();
        for record in records
            .iter()
            .filter(|r| r.tenant_id == tenant_id && Self::in_period(r, period))
        {
            totals.tokens += record.total_tokens();
            totals.requests += 1;
            totals.cost_usd += record.cost_usd;
        }
        Ok(totals)
    }

    async fn summarize(&self, tenant_id: &str, period: UsagePeriod) -> Result<UsageSummary> {
        self.check_available()?;
        let records = self.records.read().await;
        let mut summary = UsageSummary::default();
        for record in records
            .iter()
            .filter(|r| r.tenant_id == tenant_id && Self::in_period(r, period))
        {
            let add = |totals: &mut UsageTotals| {
                totals.tokens += record.total_tokens();
                totals.requests += 1;
                totals.cost_usd += record.cost_usd;
            };
            add(&mut summary.totals);
            add(summary
                .by_provider
                .entry(record.provider.as_str().to_string())
                .or_default());
            add(summary
                .by_task
                .entry(record.task.as_str().to_string())
                .or_default());
            if record.success {
                summary.success_count += 1;
            } else {
                summary.failure_count += 1;
            }
        }
        Ok(summary)
    }
}
