//! Usage metering types
//!
//! A [`UsageRecord`] is an append-only fact created once per attempted
//! provider call, successful or not. Quota decisions are derived from the
//! record history on demand and never stored.

use super::completion::ProviderId;
use super::task::{Priority, TaskKind};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Immutable fact about one attempted provider call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Tenant billed for the attempt
    pub tenant_id: String,
    /// Task the attempt served
    pub task: TaskKind,
    /// Provider attempted
    pub provider: ProviderId,
    /// Model attempted
    pub model: String,
    /// Prompt-side tokens (zero for failed attempts)
    pub input_tokens: u64,
    /// Completion-side tokens (zero for failed attempts)
    pub output_tokens: u64,
    /// Cost in USD (zero for failed attempts)
    pub cost_usd: f64,
    /// Wall-clock latency of the attempt in milliseconds
    pub latency_ms: u64,
    /// Whether the attempt succeeded
    pub success: bool,
    /// Channel tag copied from the request context
    pub channel: String,
    /// Execution priority of the originating request
    #[serde(default)]
    pub priority: Priority,
    /// When the attempt finished
    pub recorded_at: DateTime<Utc>,
}

impl UsageRecord {
    /// Total tokens for quota accounting
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Configured monthly budgets for one tenant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageLimits {
    /// Tokens per calendar month
    pub tokens_per_month: u64,
    /// Requests per calendar month
    pub requests_per_month: u64,
    /// Cost per calendar month, USD
    pub cost_per_month_usd: f64,
}

impl Default for UsageLimits {
    fn default() -> Self {
        Self {
            tokens_per_month: crate::constants::DEFAULT_MONTHLY_TOKEN_LIMIT,
            requests_per_month: crate::constants::DEFAULT_MONTHLY_REQUEST_LIMIT,
            cost_per_month_usd: crate::constants::DEFAULT_MONTHLY_COST_LIMIT_USD,
        }
    }
}

/// Aggregated usage over a billing window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageTotals {
    /// Total tokens (input + output) across attempts
    pub tokens: u64,
    /// Number of attempts
    pub requests: u64,
    /// Total cost, USD
    pub cost_usd: f64,
}

/// Result of a pre-flight quota check, derived on demand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitCheck {
    /// Whether the tenant may make another call this billing period
    pub allowed: bool,
    /// Breached dimension when `allowed` is false ("tokens"/"requests"/"cost")
    pub reason: Option<String>,
    /// Current totals for the billing period
    pub totals: UsageTotals,
    /// Limits the totals were compared against, absent on fail-open
    pub limits: Option<UsageLimits>,
    /// `max(tokens/token_limit, cost/cost_limit) * 100`, rounded
    pub percent_used: u32,
}

impl LimitCheck {
    /// The fail-open result used when the usage store is unavailable
    pub fn fail_open() -> Self {
        Self {
            allowed: true,
            reason: None,
            totals: UsageTotals::default(),
            limits: None,
            percent_used: 0,
        }
    }
}

/// Time window for usage aggregation queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePeriod {
    /// Inclusive start
    pub start: DateTime<Utc>,
    /// Exclusive end
    pub end: DateTime<Utc>,
}

impl UsagePeriod {
    /// The current calendar month in UTC, the billing window
    pub fn current_month(now: DateTime<Utc>) -> Self {
        let start = Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(now);
        Self { start, end: now }
    }
}

/// Read-only aggregation for dashboards, grouped by provider and task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageSummary {
    /// Overall totals for the period
    pub totals: UsageTotals,
    /// Totals grouped by provider wire name
    pub by_provider: HashMap<String, UsageTotals>,
    /// Totals grouped by task wire name
    pub by_task: HashMap<String, UsageTotals>,
    /// Successful attempts in the period
    pub success_count: u64,
    /// Failed attempts in the period
    pub failure_count: u64,
}
