//! Provider adapters for airelay
//!
//! Implements the domain ports against real backends: three LLM provider
//! adapters over `reqwest` with shared retry/backoff/timeout plumbing, a
//! Moka cache provider, and in-memory implementations of the durable
//! store ports for tests and single-process deployments.

/// Cache backend providers
pub mod cache;
/// Provider-level constants
pub mod constants;
/// LLM backend adapters
pub mod llm;
/// In-memory store implementations
pub mod stores;
