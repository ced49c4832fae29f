//! Durable job queue repository
//!
//! The queue abstraction: `enqueue`/`claim`/`update`/`dead_letter` over
//! any durable store (relational table with polling, or a broker). The
//! worker pool concurrency and retry policy are the load-bearing
//! contract, not the backing technology.

use crate::error::Result;
use crate::value_objects::{DeadLetter, Job, QueueStats};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for durable job state
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a newly submitted job
    async fn enqueue(&self, job: Job) -> Result<()>;

    /// Atomically claim the oldest claimable job, marking it active
    ///
    /// A job is claimable when it is `Waiting`, or `Delayed` with
    /// `available_at` in the past. Returns `None` when the queue is idle.
    async fn claim_next(&self) -> Result<Option<Job>>;

    /// Persist updated job state (progress, status, result)
    async fn update(&self, job: &Job) -> Result<()>;

    /// Fetch a job by id
    async fn get(&self, id: Uuid) -> Result<Option<Job>>;

    /// Cancel a job that has not begun executing
    ///
    /// Returns `false` when the job is active or terminal.
    async fn cancel(&self, id: Uuid) -> Result<bool>;

    /// Count jobs by status
    async fn stats(&self) -> Result<QueueStats>;

    /// Record a job that exhausted queue-level retries
    async fn record_dead_letter(&self, letter: DeadLetter) -> Result<()>;

    /// List dead letters for operator inspection
    async fn dead_letters(&self) -> Result<Vec<DeadLetter>>;
}
