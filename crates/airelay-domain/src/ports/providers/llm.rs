//! LLM Provider Port
//!
//! The uniform contract every external LLM backend is wrapped behind.
//! Implementations own per-call timeout, retry/backoff and error
//! classification; the orchestrator only ever sees this interface and the
//! circuit breaker that gates it.

use crate::error::Result;
use crate::value_objects::{CompletionRequest, CompletionResponse, ProviderId};
use async_trait::async_trait;

/// Port for external LLM backends
///
/// Adding a provider means registering a new implementation in the
/// provider map built at startup, never editing a dispatch switch.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Stable identifier used for routing, breaker keys and attribution
    fn id(&self) -> ProviderId;

    /// Perform one logical completion call
    ///
    /// A logical call may involve several network attempts (adapter-level
    /// retry with backoff); the reported latency covers all of them.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;
}
