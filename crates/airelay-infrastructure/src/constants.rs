//! Infrastructure constants

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "AIRELAY";

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILENAME: &str = "airelay.toml";

/// Default circuit breaker consecutive-failure threshold
pub const CIRCUIT_BREAKER_FAILURE_THRESHOLD: u32 = 5;

/// Default circuit breaker reset timeout, in seconds
pub const CIRCUIT_BREAKER_RESET_TIMEOUT_SECS: u64 = 30;

/// Default consecutive successes required to close a half-open breaker
pub const CIRCUIT_BREAKER_SUCCESS_THRESHOLD: u32 = 2;

/// Default number of probe calls admitted while half-open
pub const CIRCUIT_BREAKER_HALF_OPEN_PROBES: u32 = 2;

/// Default worker poll interval when the queue is idle, in milliseconds
pub const WORKER_POLL_INTERVAL_MS: u64 = 250;

/// Default maximum research cache entries
pub const RESEARCH_CACHE_MAX_ENTRIES: u64 = 10_000;
