//! Provider-level constants

/// JSON content type header value
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Default OpenAI API base URL
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default Anthropic API base URL
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Anthropic API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default Perplexity API base URL
pub const PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";

/// Default per-attempt timeout for pure completion providers, in seconds
pub const COMPLETION_TIMEOUT_SECS: u64 = 30;

/// Default per-attempt timeout for the web-search-backed provider, in seconds
pub const SEARCH_TIMEOUT_SECS: u64 = 90;

/// Default retry attempts for pure completion providers
pub const COMPLETION_MAX_RETRIES: u32 = 3;

/// Default retry attempts for the web-search-backed provider
pub const SEARCH_MAX_RETRIES: u32 = 1;

/// Default initial backoff delay for pure completion providers, in ms
pub const COMPLETION_INITIAL_BACKOFF_MS: u64 = 500;

/// Default initial backoff delay for the web-search-backed provider, in ms
pub const SEARCH_INITIAL_BACKOFF_MS: u64 = 1_000;

/// Flat per-request surcharge for Perplexity search models, USD
pub const PERPLEXITY_REQUEST_SURCHARGE_USD: f64 = 0.005;
