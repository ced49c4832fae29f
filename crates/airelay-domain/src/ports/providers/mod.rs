//! External service provider ports

/// Cache backend port
pub mod cache;
/// LLM backend port
pub mod llm;

pub use cache::{CacheEntryConfig, CacheProvider};
pub use llm::LlmProvider;
