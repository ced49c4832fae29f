//! Usage metering and quota enforcement
//!
//! Records one immutable usage fact per attempted provider call and
//! evaluates tenants against their monthly budgets. Metering must never
//! block or fail the primary operation: writes swallow storage errors and
//! the quota check fails open when the ledger is unavailable.

use airelay_domain::error::Result;
use airelay_domain::repositories::UsageStore;
use airelay_domain::value_objects::{
    LimitCheck, UsageLimits, UsagePeriod, UsageRecord, UsageSummary, UsageTotals,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

/// Usage meter over the append-only ledger
pub struct UsageMeter {
    store: Arc<dyn UsageStore>,
    limits: UsageLimits,
}

impl UsageMeter {
    /// Create a meter with the configured monthly limits
    pub fn new(store: Arc<dyn UsageStore>, limits: UsageLimits) -> Self {
        Self { store, limits }
    }

    /// Append one usage fact; storage failures are logged and swallowed
    pub async fn record_usage(&self, record: UsageRecord) {
        if let Err(err) = self.store.append(record).await {
            warn!(error = %err, "failed to record usage fact, continuing");
        }
    }

    /// Evaluate the tenant against its monthly budgets
    ///
    /// Breach priority: tokens, then requests, then cost. Any error while
    /// computing usage fails open so a metering outage never blocks
    /// production traffic.
    pub async fn check_limits(&self, tenant_id: &str) -> LimitCheck {
        let period = UsagePeriod::current_month(Utc::now());
        let totals = match self.store.totals(tenant_id, period).await {
            Ok(totals) => totals,
            Err(err) => {
                warn!(tenant_id, error = %err, "usage store unavailable, failing open");
                return LimitCheck::fail_open();
            }
        };

        let limits = self.limits;
        let reason = if totals.tokens >= limits.tokens_per_month {
            Some("tokens")
        } else if totals.requests >= limits.requests_per_month {
            Some("requests")
        } else if totals.cost_usd >= limits.cost_per_month_usd {
            Some("cost")
        } else {
            None
        };

        LimitCheck {
            allowed: reason.is_none(),
            reason: reason.map(String::from),
            totals,
            limits: Some(limits),
            percent_used: Self::percent_used(&totals, &limits),
        }
    }

    fn percent_used(totals: &UsageTotals, limits: &UsageLimits) -> u32 {
        let token_share = if limits.tokens_per_month > 0 {
            totals.tokens as f64 / limits.tokens_per_month as f64
        } else {
            0.0
        };
        let cost_share = if limits.cost_per_month_usd > 0.0 {
            totals.cost_usd / limits.cost_per_month_usd
        } else {
            0.0
        };
        (token_share.max(cost_share) * 100.0).round() as u32
    }

    /// Aggregate usage over a period for dashboards; not on the hot path
    pub async fn usage_summary(
        &self,
        tenant_id: &str,
        period: Option<UsagePeriod>,
    ) -> Result<UsageSummary> {
        let period = period.unwrap_or_else(|| UsagePeriod::current_month(Utc::now()));
        self.store.summarize(tenant_id, period).await
    }

    /// The limits this meter enforces
    pub fn limits(&self) -> UsageLimits {
        self.limits
    }
}
