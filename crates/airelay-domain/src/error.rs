//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a provider call failure
///
/// Drives the adapter-level retry decision: rate limits, server errors
/// and timeouts are retried with backoff; bad requests and auth failures
/// propagate immediately and trigger fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// HTTP 429 or provider-reported rate limiting
    RateLimited,
    /// HTTP 5xx or transport-level failure
    Server,
    /// Wall-clock timeout or cancelled in-flight call
    Timeout,
    /// HTTP 4xx other than rate limit / auth
    BadRequest,
    /// HTTP 401/403 or missing credentials at call time
    Auth,
}

impl ProviderErrorKind {
    /// Whether the adapter should retry this failure locally
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimited | Self::Server | Self::Timeout)
    }
}

/// Main error type for the airelay routing engine
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related error (missing credential, bad setting)
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// A single provider call failed
    #[error("Provider error [{provider}]: {message}")]
    Provider {
        /// Provider identifier that produced the failure
        provider: String,
        /// Description of the provider failure
        message: String,
        /// Failure classification driving retry behavior
        kind: ProviderErrorKind,
    },

    /// Circuit breaker rejected the call without touching the network
    #[error("Circuit open for provider {provider}")]
    CircuitOpen {
        /// Provider whose breaker is open
        provider: String,
    },

    /// Tenant exceeded a monthly usage limit; no provider was contacted
    #[error("Usage limit exceeded for {dimension}: {message}")]
    QuotaExceeded {
        /// The breached dimension: "tokens", "requests" or "cost"
        dimension: String,
        /// Human-readable detail with current totals
        message: String,
    },

    /// No routing entry exists for the requested task
    #[error("Routing error: {message}")]
    Routing {
        /// Description of the routing failure
        message: String,
    },

    /// Cache subsystem failure (always recovered by callers on the hot path)
    #[error("Cache error: {message}")]
    Cache {
        /// Description of the cache error
        message: String,
    },

    /// Durable store failure (usage ledger, prompts, jobs)
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a provider error with a failure classification
    pub fn provider<P: Into<String>, S: Into<String>>(
        provider: P,
        message: S,
        kind: ProviderErrorKind,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a circuit-open rejection
    pub fn circuit_open<P: Into<String>>(provider: P) -> Self {
        Self::CircuitOpen {
            provider: provider.into(),
        }
    }

    /// Create a quota-exceeded error for a specific dimension
    pub fn quota_exceeded<D: Into<String>, S: Into<String>>(dimension: D, message: S) -> Self {
        Self::QuotaExceeded {
            dimension: dimension.into(),
            message: message.into(),
        }
    }

    /// Create a routing error
    pub fn routing<S: Into<String>>(message: S) -> Self {
        Self::Routing {
            message: message.into(),
        }
    }

    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Storage error creation methods
impl Error {
    /// Create a storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage error with source
    pub fn storage_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl Error {
    /// Whether the adapter should retry this error within one provider call
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider { kind, .. } => kind.is_retryable(),
            _ => false,
        }
    }
}
