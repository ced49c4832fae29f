//! Domain-wide constants and defaults

/// Default monthly token budget per tenant
pub const DEFAULT_MONTHLY_TOKEN_LIMIT: u64 = 1_000_000;

/// Default monthly request budget per tenant
pub const DEFAULT_MONTHLY_REQUEST_LIMIT: u64 = 10_000;

/// Default monthly cost budget per tenant, in USD
pub const DEFAULT_MONTHLY_COST_LIMIT_USD: f64 = 50.0;

/// Default TTL for cached research responses (24 hours)
pub const DEFAULT_RESEARCH_CACHE_TTL_SECS: u64 = 86_400;

/// Default confidence below which a classification needs human review
pub const DEFAULT_REVIEW_THRESHOLD: f64 = 0.7;

/// Default queue-level retry attempts per job
pub const DEFAULT_JOB_MAX_ATTEMPTS: u32 = 3;

/// Default base delay between queue-level retries, in milliseconds
pub const DEFAULT_JOB_RETRY_DELAY_MS: u64 = 5_000;

/// Default worker pool concurrency (kept small for upstream rate limits)
pub const DEFAULT_WORKER_CONCURRENCY: usize = 3;

/// Default temperature when a prompt record carries no override
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
