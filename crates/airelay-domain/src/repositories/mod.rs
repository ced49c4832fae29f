//! Repository interfaces for durable state
//!
//! The relational store behind these traits is an external collaborator;
//! this crate only specifies the boundary. In-memory implementations live
//! in `airelay-providers` for tests and single-process deployments.

/// Durable job queue repository
pub mod job_store;
/// Tenant prompt repository
pub mod prompt_store;
/// Append-only usage ledger repository
pub mod usage_store;

pub use job_store::JobStore;
pub use prompt_store::PromptStore;
pub use usage_store::UsageStore;
