//! Domain Port Interfaces
//!
//! Boundary contracts between the domain and outer layers, following the
//! Dependency Inversion Principle: this layer defines the interfaces,
//! providers and infrastructure implement them.

/// External service provider ports
pub mod providers;

pub use providers::{CacheEntryConfig, CacheProvider, LlmProvider};
