//! Durable background job queue
//!
//! Submission, status, cancellation and stats over the [`JobStore`]
//! abstraction. Execution lives in [`worker`]; result delivery in
//! [`callback`]. Queue-level retries re-run the whole task through the
//! orchestrator, distinct from adapter-level retries of a single call.

use airelay_domain::error::{Error, Result};
use airelay_domain::repositories::JobStore;
use airelay_domain::value_objects::{
    ClassifyBatchPayload, DeadLetter, Job, JobKind, QueueStats, TaskJobPayload,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Best-effort HTTP result delivery
pub mod callback;
/// Bounded worker pool that drains the queue
pub mod worker;

pub use callback::CallbackSender;
pub use worker::{WorkerConfig, WorkerPool};

/// Client-facing handle over the durable job store
pub struct JobQueue {
    store: Arc<dyn JobStore>,
}

impl JobQueue {
    /// Create a queue over a job store
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Submit a single-task job
    pub async fn submit_task(
        &self,
        payload: TaskJobPayload,
        callback_url: Option<String>,
    ) -> Result<Uuid> {
        let job = Job::new(JobKind::Task, serde_json::to_value(&payload)?, callback_url);
        let id = job.id;
        self.store.enqueue(job).await?;
        info!(job_id = %id, task = %payload.task, "task job submitted");
        Ok(id)
    }

    /// Submit a batch classification job
    pub async fn submit_classify_batch(
        &self,
        payload: ClassifyBatchPayload,
        callback_url: Option<String>,
    ) -> Result<Uuid> {
        if payload.messages.is_empty() {
            return Err(Error::invalid_argument(
                "classify batch must contain at least one message",
            ));
        }
        let job = Job::new(
            JobKind::ClassifyBatch,
            serde_json::to_value(&payload)?,
            callback_url,
        );
        let id = job.id;
        self.store.enqueue(job).await?;
        info!(job_id = %id, items = payload.messages.len(), "classify batch submitted");
        Ok(id)
    }

    /// Current status, progress and result of a job
    pub async fn status(&self, id: Uuid) -> Result<Job> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("job {id}")))
    }

    /// Cancel a job that has not begun executing
    ///
    /// The record is kept with status `Cancelled` so it stays queryable.
    /// Returns `false` when the job is already active or terminal.
    pub async fn cancel(&self, id: Uuid) -> Result<bool> {
        let cancelled = self.store.cancel(id).await?;
        if cancelled {
            info!(job_id = %id, "job cancelled before execution");
        }
        Ok(cancelled)
    }

    /// Queue depth by status
    pub async fn stats(&self) -> Result<QueueStats> {
        self.store.stats().await
    }

    /// Dead letters recorded for operator inspection
    pub async fn dead_letters(&self) -> Result<Vec<DeadLetter>> {
        self.store.dead_letters().await
    }
}
