//! Domain Value Objects
//!
//! Immutable value objects that represent concepts in the routing engine
//! without identity. Value objects are defined by their attributes and can
//! be compared for equality.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`TaskKind`] | Enumerated logical AI operation with static routing |
//! | [`RequestContext`] | Tenant/correlation metadata carried through a call |
//! | [`AiRequest`] / [`AiResult`] | Orchestrator request and annotated result |
//! | [`CompletionRequest`] / [`CompletionResponse`] | Provider adapter call contract |
//! | [`UsageRecord`] | Append-only fact about one attempted call |
//! | [`PromptRecord`] | Tenant-scoped versioned prompt template |
//! | [`Job`] | Durable asynchronously executed unit of work |

/// Provider adapter call contract types
pub mod completion;
/// Request context carried through a call
pub mod context;
/// Durable background job types
pub mod job;
/// Tenant prompt template types
pub mod prompt;
/// Orchestrator request/result types
pub mod request;
/// Logical task enumeration
pub mod task;
/// Usage metering types
pub mod usage;

// Re-export commonly used value objects
pub use completion::{
    ChatMessage, CompletionRequest, CompletionResponse, ProviderId, ResponseFormat, Role,
    TokenUsage,
};
pub use context::RequestContext;
pub use job::{
    ClassifyBatchPayload, DeadLetter, Job, JobKind, JobStatus, QueueStats, TaskJobPayload,
};
pub use prompt::PromptRecord;
pub use request::{AiRequest, AiResult};
pub use task::{Priority, TaskKind};
pub use usage::{LimitCheck, UsageLimits, UsagePeriod, UsageRecord, UsageSummary, UsageTotals};
