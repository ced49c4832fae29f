//! Configuration loading and types
//!
//! Sources merge in order: built-in defaults, then an optional TOML file,
//! then `AIRELAY_`-prefixed environment variables.

/// Figment-based configuration loader
pub mod loader;
/// Configuration section types
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, BreakerSection, BreakersConfig, CacheConfig, LimitsConfig, LoggingConfig,
    ProviderSection, ProvidersConfig, QueueConfig,
};
