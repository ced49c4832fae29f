//! Bounded worker pool over the job store
//!
//! A fixed number of workers poll for claimable jobs and run them through
//! the orchestrator. A failed attempt is redelivered with exponential
//! backoff until the attempt budget is exhausted, at which point the job
//! is failed and dead-lettered. Batch items are processed strictly in
//! order so progress only ever increases.

use super::callback::CallbackSender;
use airelay_domain::constants::{
    DEFAULT_JOB_MAX_ATTEMPTS, DEFAULT_JOB_RETRY_DELAY_MS, DEFAULT_REVIEW_THRESHOLD,
    DEFAULT_WORKER_CONCURRENCY,
};
use airelay_domain::error::Error;
use airelay_domain::repositories::JobStore;
use airelay_domain::value_objects::{
    AiRequest, ClassifyBatchPayload, DeadLetter, Job, JobKind, JobStatus, Priority,
    RequestContext, TaskJobPayload, TaskKind,
};
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::orchestrator::Orchestrator;

/// Worker pool tuning
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
    /// Number of concurrent workers
    pub concurrency: usize,
    /// Idle poll interval
    pub poll_interval: Duration,
    /// Queue-level attempt budget per job
    pub max_attempts: u32,
    /// Base delay before the first redelivery; doubles per attempt
    pub retry_delay: Duration,
    /// Confidence below which a batch item is flagged for review
    pub review_threshold: f64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_WORKER_CONCURRENCY,
            poll_interval: Duration::from_millis(crate::constants::WORKER_POLL_INTERVAL_MS),
            max_attempts: DEFAULT_JOB_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_JOB_RETRY_DELAY_MS),
            review_threshold: DEFAULT_REVIEW_THRESHOLD,
        }
    }
}

struct WorkerInner {
    store: Arc<dyn JobStore>,
    orchestrator: Arc<Orchestrator>,
    callbacks: CallbackSender,
    config: WorkerConfig,
}

/// Pool of workers draining the job queue
pub struct WorkerPool {
    inner: Arc<WorkerInner>,
    shutdown_tx: watch::Sender<bool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Create a pool; no workers run until [`start`](Self::start)
    pub fn new(
        store: Arc<dyn JobStore>,
        orchestrator: Arc<Orchestrator>,
        config: WorkerConfig,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(WorkerInner {
                store,
                orchestrator,
                callbacks: CallbackSender::new(),
                config,
            }),
            shutdown_tx,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn the configured number of workers
    pub fn start(&self) {
        let mut handles = match self.handles.lock() {
            Ok(handles) => handles,
            Err(poisoned) => poisoned.into_inner(),
        };
        for worker_id in 0..self.inner.config.concurrency {
            let inner = Arc::clone(&self.inner);
            let shutdown_rx = self.shutdown_tx.subscribe();
            handles.push(tokio::spawn(worker_loop(inner, worker_id, shutdown_rx)));
        }
        info!(concurrency = self.inner.config.concurrency, "worker pool started");
    }

    /// Signal shutdown and wait for in-flight jobs to finish
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        let handles: Vec<_> = match self.handles.lock() {
            Ok(mut handles) => handles.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        };
        for handle in handles {
            let _ = handle.await;
        }
        info!("worker pool stopped");
    }

    /// Process exactly one claimable job, for tests and manual draining
    pub async fn drain_one(&self) -> bool {
        match self.inner.store.claim_next().await {
            Ok(Some(job)) => {
                self.inner.process(job).await;
                true
            }
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "failed to claim a job");
                false
            }
        }
    }
}

async fn worker_loop(
    inner: Arc<WorkerInner>,
    worker_id: usize,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    debug!(worker_id, "worker started");
    loop {
        if *shutdown_rx.borrow() {
            break;
        }
        match inner.store.claim_next().await {
            Ok(Some(job)) => {
                debug!(worker_id, job_id = %job.id, attempt = job.attempts, "job claimed");
                inner.process(job).await;
            }
            Ok(None) => {
                tokio::select! {
                    _ = tokio::time::sleep(inner.config.poll_interval) => {}
                    _ = shutdown_rx.changed() => {}
                }
            }
            Err(err) => {
                warn!(worker_id, error = %err, "job claim failed");
                tokio::time::sleep(inner.config.poll_interval).await;
            }
        }
    }
    debug!(worker_id, "worker stopped");
}

impl WorkerInner {
    async fn process(&self, mut job: Job) {
        let outcome = match job.kind {
            JobKind::Task => self.run_task(&mut job).await,
            JobKind::ClassifyBatch => self.run_classify_batch(&mut job).await,
        };

        match outcome {
            Ok(()) => {
                job.status = JobStatus::Completed;
                job.progress = 100;
                job.error = None;
            }
            Err(err) => {
                self.handle_failure(&mut job, err).await;
            }
        }
        job.updated_at = Utc::now();
        if let Err(err) = self.store.update(&job).await {
            error!(job_id = %job.id, error = %err, "failed to persist job state");
            return;
        }
        if job.status.is_terminal() {
            self.callbacks.notify(&job).await;
        }
    }

    async fn run_task(&self, job: &mut Job) -> Result<(), Error> {
        let payload: TaskJobPayload = serde_json::from_value(job.payload.clone())?;
        let mut request = background_request(payload.task, payload.context, payload.input);
        request.prompt_key = payload.prompt_key;
        let result = self.orchestrator.execute(request).await?;
        job.result = Some(serde_json::to_value(&result)?);
        Ok(())
    }

    /// Classify each message in order, catching per-item failures
    ///
    /// A failed item becomes a placeholder entry flagged for review; the
    /// batch itself completes as long as every item was attempted.
    async fn run_classify_batch(&self, job: &mut Job) -> Result<(), Error> {
        let payload: ClassifyBatchPayload = serde_json::from_value(job.payload.clone())?;
        let threshold = payload
            .review_threshold
            .unwrap_or(self.config.review_threshold);
        let total = payload.messages.len();
        let mut results = Vec::with_capacity(total);

        for (index, message) in payload.messages.into_iter().enumerate() {
            let request =
                background_request(TaskKind::SmsClassify, payload.context.clone(), message);
            let entry = match self.orchestrator.execute(request).await {
                Ok(result) => {
                    let confidence = result
                        .record
                        .as_ref()
                        .and_then(|record| record.get("confidence"))
                        .and_then(serde_json::Value::as_f64);
                    json!({
                        "status": "ok",
                        "output": result.output,
                        "record": result.record,
                        "provider": result.provider,
                        "degraded": result.degraded,
                        "needs_review": confidence.is_none_or(|c| c < threshold),
                    })
                }
                Err(err) => {
                    warn!(job_id = %job.id, index, error = %err, "batch item failed");
                    json!({
                        "status": "error",
                        "error": err.to_string(),
                        "needs_review": true,
                    })
                }
            };
            results.push(entry);

            job.progress = progress_percent(index + 1, total);
            job.result = Some(json!({ "results": results }));
            job.updated_at = Utc::now();
            if let Err(err) = self.store.update(job).await {
                warn!(job_id = %job.id, error = %err, "failed to persist batch progress");
            }
        }
        Ok(())
    }

    /// Redeliver with backoff, or fail and dead-letter on exhaustion
    async fn handle_failure(&self, job: &mut Job, err: Error) {
        job.error = Some(err.to_string());
        if job.attempts >= self.config.max_attempts {
            job.status = JobStatus::Failed;
            let letter = DeadLetter {
                job_id: job.id,
                kind: job.kind,
                payload: job.payload.clone(),
                reason: err.to_string(),
                attempts: job.attempts,
                recorded_at: Utc::now(),
            };
            if let Err(dl_err) = self.store.record_dead_letter(letter).await {
                error!(job_id = %job.id, error = %dl_err, "failed to record dead letter");
            }
            error!(
                job_id = %job.id,
                attempts = job.attempts,
                error = %err,
                "job exhausted queue-level retries"
            );
        } else {
            let delay = retry_delay(self.config.retry_delay, job.attempts);
            job.status = JobStatus::Delayed;
            job.available_at = Utc::now()
                + ChronoDuration::milliseconds(delay.as_millis() as i64);
            warn!(
                job_id = %job.id,
                attempt = job.attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "job attempt failed, scheduling redelivery"
            );
        }
    }
}

/// Worker-issued requests carry background priority for log and usage
/// attribution
fn background_request(
    task: TaskKind,
    context: RequestContext,
    input: serde_json::Value,
) -> AiRequest {
    let mut request = AiRequest::new(task, context, input);
    request.priority = Priority::Background;
    request
}

/// `round(completed / total × 100)`, monotonic in `completed`
fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// Base delay doubled per consumed attempt
fn retry_delay(base: Duration, attempts: u32) -> Duration {
    base * 2u32.saturating_pow(attempts.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_item_batch_reports_33_67_100() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
    }

    #[test]
    fn progress_is_monotonic() {
        let mut last = 0;
        for completed in 1..=7 {
            let p = progress_percent(completed, 7);
            assert!(p >= last);
            last = p;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn worker_requests_carry_background_priority() {
        let request = background_request(
            TaskKind::SmsClassify,
            RequestContext::new("t1", "sms"),
            serde_json::json!({"message": "hi"}),
        );
        assert_eq!(request.priority, Priority::Background);
    }

    #[test]
    fn redelivery_delay_doubles_per_attempt() {
        let base = Duration::from_secs(5);
        assert_eq!(retry_delay(base, 1), Duration::from_secs(5));
        assert_eq!(retry_delay(base, 2), Duration::from_secs(10));
        assert_eq!(retry_delay(base, 3), Duration::from_secs(20));
    }
}
