//! Orchestrator request and result types

use super::completion::{ProviderId, TokenUsage};
use super::context::RequestContext;
use super::task::{Priority, TaskKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One synchronous execution request handed to the orchestrator
///
/// The input payload is opaque to the orchestrator; it is interpolated
/// into the resolved prompt template or serialized verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRequest {
    /// Logical operation to perform; must have a routing entry
    pub task: TaskKind,
    /// Execution priority
    #[serde(default)]
    pub priority: Priority,
    /// Tenant/correlation metadata
    pub context: RequestContext,
    /// Opaque input payload, serializable
    pub input: serde_json::Value,
    /// Optional prompt key overriding the task-name lookup
    pub prompt_key: Option<String>,
    /// Optional idempotency key; wins over the content hash as cache key
    pub idempotency_key: Option<String>,
    /// Only attempt the default provider, never the fallback chain
    #[serde(default)]
    pub skip_fallback: bool,
    /// Skip the pre-flight quota check (internal/system calls only)
    #[serde(default)]
    pub skip_limit_check: bool,
    /// Advisory latency budget in milliseconds; overruns are logged
    #[serde(default)]
    pub max_latency_ms: Option<u64>,
    /// Advisory cost budget in USD; overruns are logged
    #[serde(default)]
    pub max_cost_usd: Option<f64>,
}

impl AiRequest {
    /// Build a request with defaults for the optional fields
    pub fn new(task: TaskKind, context: RequestContext, input: serde_json::Value) -> Self {
        Self {
            task,
            priority: Priority::default(),
            context,
            input,
            prompt_key: None,
            idempotency_key: None,
            skip_fallback: false,
            skip_limit_check: false,
            max_latency_ms: None,
            max_cost_usd: None,
        }
    }
}

/// Structured result of one orchestrator execution
///
/// Exactly one provider is recorded as having served the request, or the
/// call failed entirely and no result exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResult {
    /// Raw model output; for structured tasks also parsed into `record`
    pub output: String,
    /// Parsed record for structured tasks, when parsing succeeded
    pub record: Option<serde_json::Value>,
    /// Provider that actually served the request
    pub provider: ProviderId,
    /// Model that actually served the request
    pub model: String,
    /// True iff a non-primary provider served the request
    pub degraded: bool,
    /// Token usage, absent for cached responses
    pub usage: Option<TokenUsage>,
    /// Cost of the serving call in USD, absent for cached responses
    pub cost_usd: Option<f64>,
    /// Trace id copied from the request context
    pub trace_id: String,
    /// End-to-end latency of the execute call
    #[serde(with = "duration_millis")]
    pub latency: Duration,
    /// True iff the response was served from the research cache
    pub cached: bool,
}


mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        (d.as_millis() as u64).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
