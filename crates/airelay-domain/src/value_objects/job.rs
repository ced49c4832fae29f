//! Durable background job types
//!
//! A [`Job`] wraps one or more task executions for asynchronous
//! processing. Queue-level retries re-run the entire task (including a
//! fresh fallback chain), distinct from the adapter-level retry that
//! re-runs a single provider call.

use super::context::RequestContext;
use super::task::TaskKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Ready for execution, waiting for a worker
    Waiting,
    /// A worker is processing the job
    Active,
    /// Finished successfully. Terminal.
    Completed,
    /// Exhausted queue-level retries. Terminal.
    Failed,
    /// Scheduled for a retry at `available_at`
    Delayed,
    /// Withdrawn by the caller before execution started. Terminal.
    Cancelled,
}

impl JobStatus {
    /// Whether no further transitions are possible
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Waiting => "waiting",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Delayed => "delayed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// What kind of work a job performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// One orchestrator execution
    Task,
    /// Sequential classification of N messages with progress reporting
    ClassifyBatch,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Task => "task",
            Self::ClassifyBatch => "classify_batch",
        };
        f.write_str(s)
    }
}

/// Payload for a [`JobKind::Task`] job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskJobPayload {
    /// Task to execute
    pub task: TaskKind,
    /// Tenant/correlation metadata
    pub context: RequestContext,
    /// Opaque input forwarded to the orchestrator
    pub input: serde_json::Value,
    /// Optional prompt key override
    pub prompt_key: Option<String>,
}

/// Payload for a [`JobKind::ClassifyBatch`] job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyBatchPayload {
    /// Tenant/correlation metadata shared by every item
    pub context: RequestContext,
    /// Messages to classify, processed strictly in this order
    pub messages: Vec<serde_json::Value>,
    /// Confidence below which an item is flagged for human review;
    /// falls back to the configured default when absent
    pub review_threshold: Option<f64>,
}

/// A durable, asynchronously executed unit of work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job id
    pub id: Uuid,
    /// What kind of work this job performs
    pub kind: JobKind,
    /// Kind-specific payload, deserialized by the worker
    pub payload: serde_json::Value,
    /// Current lifecycle state
    pub status: JobStatus,
    /// Monotonically increasing completion percentage (0-100)
    pub progress: u8,
    /// Result on completion; for batches, one entry per item
    pub result: Option<serde_json::Value>,
    /// Human-readable failure reason on terminal failure
    pub error: Option<String>,
    /// Execution attempts so far
    pub attempts: u32,
    /// Optional URL to POST the result to on completion
    pub callback_url: Option<String>,
    /// Earliest time a delayed job may be claimed again
    pub available_at: DateTime<Utc>,
    /// Submission time
    pub created_at: DateTime<Utc>,
    /// Last state change
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Build a freshly submitted job
    pub fn new(kind: JobKind, payload: serde_json::Value, callback_url: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            payload,
            status: JobStatus::Waiting,
            progress: 0,
            result: None,
            error: None,
            attempts: 0,
            callback_url,
            available_at: now,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Snapshot of queue depth by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Jobs waiting for a worker
    pub waiting: u64,
    /// Jobs being processed
    pub active: u64,
    /// Jobs finished successfully
    pub completed: u64,
    /// Jobs that exhausted retries
    pub failed: u64,
    /// Jobs scheduled for a retry
    pub delayed: u64,
    /// Jobs withdrawn before execution
    pub cancelled: u64,
}

/// Terminal record of a job that exhausted queue-level retries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetter {
    /// Id of the dead job
    pub job_id: Uuid,
    /// Kind of the dead job
    pub kind: JobKind,
    /// Payload at the time of death, for operator inspection
    pub payload: serde_json::Value,
    /// Reason the final attempt failed
    pub reason: String,
    /// Attempts consumed before giving up
    pub attempts: u32,
    /// When the job was dead-lettered
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(!JobStatus::Waiting.is_terminal());
        assert!(!JobStatus::Active.is_terminal());
        assert!(!JobStatus::Delayed.is_terminal());
    }

    #[test]
    fn new_job_starts_waiting_with_zero_progress() {
        let job = Job::new(JobKind::Task, serde_json::json!({}), None);
        assert_eq!(job.status, JobStatus::Waiting);
        assert_eq!(job.progress, 0);
        assert_eq!(job.attempts, 0);
        assert!(job.result.is_none());
    }
}
