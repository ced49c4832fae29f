//! In-memory job queue store
//!
//! Implements the durable queue port over process memory with the same
//! claim semantics a relational polling table would have: oldest
//! claimable job first, claim marks the job active and consumes one
//! attempt.

use airelay_domain::error::Result;
use airelay_domain::repositories::JobStore;
use airelay_domain::value_objects::{DeadLetter, Job, JobStatus, QueueStats};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory job store
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
    dead: RwLock<Vec<DeadLetter>>,
}

impl InMemoryJobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn enqueue(&self, job: Job) -> Result<()> {
        self.jobs.write().await.insert(job.id, job);
        Ok(())
    }

    async fn claim_next(&self) -> Result<Option<Job>> {
        let now = Utc::now();
        let mut jobs = self.jobs.write().await;
        let claimable = jobs
            .values()
            .filter(|j| match j.status {
                JobStatus::Waiting => j.available_at <= now,
                JobStatus::Delayed => j.available_at <= now,
                _ => false,
            })
            .min_by_key(|j| j.created_at)
            .map(|j| j.id);

        let Some(id) = claimable else {
            return Ok(None);
        };
        let Some(job) = jobs.get_mut(&id) else {
            return Ok(None);
        };
        job.status = JobStatus::Active;
        job.attempts += 1;
        job.updated_at = now;
        Ok(Some(job.clone()))
    }

    async fn update(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        let mut updated = job.clone();
        updated.updated_at = Utc::now();
        jobs.insert(updated.id, updated);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn cancel(&self, id: Uuid) -> Result<bool> {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(&id) else {
            return Ok(false);
        };
        if !matches!(job.status, JobStatus::Waiting | JobStatus::Delayed) {
            return Ok(false);
        }
        // The record stays queryable so operators can see what was withdrawn
        job.status = JobStatus::Cancelled;
        job.updated_at = Utc::now();
        Ok(true)
    }

    async fn stats(&self) -> Result<QueueStats> {
        let jobs = self.jobs.read().await;
        let mut stats = QueueStats::default();
        for job in jobs.values() {
            match job.status {
                JobStatus::Waiting => stats.waiting += 1,
                JobStatus::Active => stats.active += 1,
                JobStatus::Completed => stats.completed += 1,
                JobStatus::Failed => stats.failed += 1,
                JobStatus::Delayed => stats.delayed += 1,
                JobStatus::Cancelled => stats.cancelled += 1,
            }
        }
        Ok(stats)
    }

    async fn record_dead_letter(&self, letter: DeadLetter) -> Result<()> {
        self.dead.write().await.push(letter);
        Ok(())
    }

    async fn dead_letters(&self) -> Result<Vec<DeadLetter>> {
        Ok(self.dead.read().await.clone())
    }
}
