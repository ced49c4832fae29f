//! In-memory store implementations
//!
//! Implement the durable-store ports over process memory. The production
//! deployment backs these ports with a relational store; these
//! implementations serve tests and single-process use, and can simulate
//! storage outages for fail-open coverage.

/// In-memory job queue store
pub mod job;
/// In-memory prompt store
pub mod prompt;
/// In-memory usage ledger
pub mod usage;

pub use job::InMemoryJobStore;
pub use prompt::InMemoryPromptStore;
pub use usage::InMemoryUsageStore;
