//! Cache backend providers

/// Moka in-memory cache provider
pub mod moka;
/// Null cache provider for testing
pub mod null;

pub use moka::MokaCacheProvider;
pub use null::NullCacheProvider;
