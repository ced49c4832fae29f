//! Append-only usage ledger repository

use crate::error::Result;
use crate::value_objects::{UsagePeriod, UsageRecord, UsageSummary, UsageTotals};
use async_trait::async_trait;

/// Repository for the append-only usage ledger
///
/// Writers never read-modify-write on the hot path; concurrent appends
/// need no coordination beyond the underlying store's write isolation.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Append one immutable usage fact
    async fn append(&self, record: UsageRecord) -> Result<()>;

    /// Sum usage for a tenant over a period (quota checks)
    async fn totals(&self, tenant_id: &str, period: UsagePeriod) -> Result<UsageTotals>;

    /// Aggregate usage by provider and task over a period (dashboards)
    async fn summarize(&self, tenant_id: &str, period: UsagePeriod) -> Result<UsageSummary>;
}
