//! Configuration section types

use crate::breaker::BreakerConfig;
use crate::constants::{
    CIRCUIT_BREAKER_FAILURE_THRESHOLD, CIRCUIT_BREAKER_HALF_OPEN_PROBES,
    CIRCUIT_BREAKER_RESET_TIMEOUT_SECS, CIRCUIT_BREAKER_SUCCESS_THRESHOLD,
    RESEARCH_CACHE_MAX_ENTRIES, WORKER_POLL_INTERVAL_MS,
};
use airelay_domain::constants::{
    DEFAULT_JOB_MAX_ATTEMPTS, DEFAULT_JOB_RETRY_DELAY_MS, DEFAULT_MONTHLY_COST_LIMIT_USD,
    DEFAULT_MONTHLY_REQUEST_LIMIT, DEFAULT_MONTHLY_TOKEN_LIMIT, DEFAULT_RESEARCH_CACHE_TTL_SECS,
    DEFAULT_REVIEW_THRESHOLD, DEFAULT_WORKER_CONCURRENCY,
};
use airelay_domain::value_objects::{ProviderId, UsageLimits};
use airelay_providers::constants::{
    COMPLETION_INITIAL_BACKOFF_MS, COMPLETION_MAX_RETRIES, COMPLETION_TIMEOUT_SECS,
    SEARCH_INITIAL_BACKOFF_MS, SEARCH_MAX_RETRIES, SEARCH_TIMEOUT_SECS,
};
use airelay_providers::llm::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Per-provider credentials and tuning
    pub providers: ProvidersConfig,
    /// Circuit breaker thresholds
    pub breakers: BreakersConfig,
    /// Monthly tenant budgets
    pub limits: LimitsConfig,
    /// Research response cache
    pub cache: CacheConfig,
    /// Job queue and worker pool
    pub queue: QueueConfig,
    /// Logging output
    pub logging: LoggingConfig,
}

/// Credentials and call tuning for one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    /// API key; empty disables the provider at call time
    pub api_key: String,
    /// Base URL override, mainly for tests and proxies
    pub base_url: Option<String>,
    /// Per-attempt wall-clock timeout
    pub timeout_secs: u64,
    /// Adapter-level retry budget per logical call
    pub max_retries: u32,
    /// First backoff delay; doubles per retry
    pub initial_backoff_ms: u64,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            timeout_secs: COMPLETION_TIMEOUT_SECS,
            max_retries: COMPLETION_MAX_RETRIES,
            initial_backoff_ms: COMPLETION_INITIAL_BACKOFF_MS,
        }
    }
}

impl ProviderSection {
    /// Build the adapter retry policy from this section
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.initial_backoff_ms),
            request_timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// All provider sections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// OpenAI chat completions
    pub openai: ProviderSection,
    /// Anthropic messages API
    pub anthropic: ProviderSection,
    /// Perplexity web-search-backed completions
    pub perplexity: ProviderSection,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            openai: ProviderSection::default(),
            anthropic: ProviderSection::default(),
            // Web search is slow and billed per request; wait longer,
            // retry less.
            perplexity: ProviderSection {
                timeout_secs: SEARCH_TIMEOUT_SECS,
                max_retries: SEARCH_MAX_RETRIES,
                initial_backoff_ms: SEARCH_INITIAL_BACKOFF_MS,
                ..ProviderSection::default()
            },
        }
    }
}

/// Circuit breaker thresholds for one provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerSection {
    /// Consecutive failures that open the breaker
    pub failure_threshold: u32,
    /// Seconds an open breaker waits before admitting probes
    pub reset_timeout_secs: u64,
    /// Consecutive half-open successes that close the breaker
    pub success_threshold: u32,
    /// Probe calls admitted concurrently while half-open
    pub half_open_max_probes: u32,
}

impl Default for BreakerSection {
    fn default() -> Self {
        Self {
            failure_threshold: CIRCUIT_BREAKER_FAILURE_THRESHOLD,
            reset_timeout_secs: CIRCUIT_BREAKER_RESET_TIMEOUT_SECS,
            success_threshold: CIRCUIT_BREAKER_SUCCESS_THRESHOLD,
            half_open_max_probes: CIRCUIT_BREAKER_HALF_OPEN_PROBES,
        }
    }
}

impl From<BreakerSection> for BreakerConfig {
    fn from(section: BreakerSection) -> Self {
        Self {
            failure_threshold: section.failure_threshold,
            reset_timeout: Duration::from_secs(section.reset_timeout_secs),
            success_threshold: section.success_threshold,
            half_open_max_probes: section.half_open_max_probes,
        }
    }
}

/// Per-provider breaker thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakersConfig {
    /// OpenAI thresholds
    pub openai: BreakerSection,
    /// Anthropic thresholds
    pub anthropic: BreakerSection,
    /// Perplexity thresholds
    pub perplexity: BreakerSection,
}

impl Default for BreakersConfig {
    fn default() -> Self {
        Self {
            openai: BreakerSection::default(),
            anthropic: BreakerSection::default(),
            // Search calls fail slower and cost more; trip earlier and
            // probe more carefully.
            perplexity: BreakerSection {
                failure_threshold: 3,
                reset_timeout_secs: 60,
                half_open_max_probes: 1,
                ..BreakerSection::default()
            },
        }
    }
}

impl BreakersConfig {
    /// Per-provider breaker configs for the registry
    pub fn to_breaker_configs(&self) -> HashMap<ProviderId, BreakerConfig> {
        HashMap::from([
            (ProviderId::OpenAi, self.openai.into()),
            (ProviderId::Anthropic, self.anthropic.into()),
            (ProviderId::Perplexity, self.perplexity.into()),
        ])
    }
}

/// Monthly tenant budgets
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Tokens per calendar month
    pub tokens_per_month: u64,
    /// Requests per calendar month
    pub requests_per_month: u64,
    /// Cost per calendar month, USD
    pub cost_per_month_usd: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            tokens_per_month: DEFAULT_MONTHLY_TOKEN_LIMIT,
            requests_per_month: DEFAULT_MONTHLY_REQUEST_LIMIT,
            cost_per_month_usd: DEFAULT_MONTHLY_COST_LIMIT_USD,
        }
    }
}

impl From<LimitsConfig> for UsageLimits {
    fn from(config: LimitsConfig) -> Self {
        Self {
            tokens_per_month: config.tokens_per_month,
            requests_per_month: config.requests_per_month,
            cost_per_month_usd: config.cost_per_month_usd,
        }
    }
}

/// Research response cache settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry TTL in seconds
    pub research_ttl_secs: u64,
    /// Maximum cached entries
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            research_ttl_secs: DEFAULT_RESEARCH_CACHE_TTL_SECS,
            max_entries: RESEARCH_CACHE_MAX_ENTRIES,
        }
    }
}

/// Job queue and worker pool settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Worker pool concurrency
    pub concurrency: usize,
    /// Idle poll interval in milliseconds
    pub poll_interval_ms: u64,
    /// Queue-level attempt budget per job
    pub max_attempts: u32,
    /// Base redelivery delay in milliseconds; doubles per attempt
    pub retry_delay_ms: u64,
    /// Default confidence threshold for batch review flagging
    pub review_threshold: f64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_WORKER_CONCURRENCY,
            poll_interval_ms: WORKER_POLL_INTERVAL_MS,
            max_attempts: DEFAULT_JOB_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_JOB_RETRY_DELAY_MS,
            review_threshold: DEFAULT_REVIEW_THRESHOLD,
        }
    }
}

impl From<QueueConfig> for crate::queue::WorkerConfig {
    fn from(config: QueueConfig) -> Self {
        Self {
            concurrency: config.concurrency,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_attempts: config.max_attempts,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            review_threshold: config.review_threshold,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable JSON output format
    pub json_format: bool,
    /// Log to a daily-rotated file in addition to stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_output: None,
        }
    }
}
