//! Job queue, worker pool and dead-letter scenarios

use super::support::HarnessBuilder;
use airelay_domain::error::ProviderErrorKind;
use airelay_domain::value_objects::{
    ClassifyBatchPayload, JobStatus, Priority, ProviderId, RequestContext, TaskJobPayload, TaskKind,
};
use airelay_infrastructure::queue::{JobQueue, WorkerConfig, WorkerPool};
use airelay_providers::llm::null::ScriptedOutcome;
use airelay_providers::llm::NullLlmProvider;
use airelay_providers::stores::InMemoryJobStore;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn worker_config() -> WorkerConfig {
    WorkerConfig {
        concurrency: 1,
        poll_interval: Duration::from_millis(5),
        max_attempts: 2,
        retry_delay: Duration::from_millis(1),
        review_threshold: 0.7,
    }
}

struct QueueHarness {
    queue: JobQueue,
    workers: WorkerPool,
    usage: Arc<airelay_providers::stores::InMemoryUsageStore>,
}

fn queue_harness(builder: HarnessBuilder) -> QueueHarness {
    queue_harness_with(builder, worker_config())
}

fn queue_harness_with(builder: HarnessBuilder, config: WorkerConfig) -> QueueHarness {
    let harness = builder.build();
    let store = Arc::new(InMemoryJobStore::new());
    let workers = WorkerPool::new(
        Arc::clone(&store) as _,
        Arc::clone(&harness.orchestrator),
        config,
    );
    QueueHarness {
        queue: JobQueue::new(store as _),
        workers,
        usage: Arc::clone(&harness.usage),
    }
}

fn task_payload(task: TaskKind, input: serde_json::Value) -> TaskJobPayload {
    TaskJobPayload {
        task,
        context: RequestContext::new("tenant-1", "web"),
        input,
        prompt_key: None,
    }
}

#[tokio::test]
async fn task_job_runs_to_completion() {
    let harness = queue_harness(HarnessBuilder::new());
    let id = harness
        .queue
        .submit_task(
            task_payload(TaskKind::LeadResearch, json!({"subject": "Acme"})),
            None,
        )
        .await
        .unwrap();

    assert!(harness.workers.drain_one().await);

    let job = harness.queue.status(id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    let result = job.result.unwrap();
    assert_eq!(result["provider"], "perplexity");
    assert_eq!(result["output"], "perplexity found facts");

    // Worker-issued calls are attributed as background traffic
    let records = harness.usage.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].priority, Priority::Background);
}

#[tokio::test]
async fn batch_completes_with_placeholder_for_failed_item() {
    // Item 2 must fail every provider in the chain
    let anthropic = NullLlmProvider::succeeding(
        ProviderId::Anthropic,
        r#"{"intent":"question","confidence":0.9}"#,
    );
    anthropic.push_outcome(ScriptedOutcome::Succeed(
        r#"{"intent":"question","confidence":0.9}"#.into(),
    ));
    anthropic.push_outcome(ScriptedOutcome::Fail(ProviderErrorKind::BadRequest));
    let harness = queue_harness(
        HarnessBuilder::new()
            .anthropic(anthropic)
            .openai(NullLlmProvider::failing(
                ProviderId::OpenAi,
                ProviderErrorKind::Server,
            ))
            .perplexity(NullLlmProvider::failing(
                ProviderId::Perplexity,
                ProviderErrorKind::Server,
            )),
    );

    let id = harness
        .queue
        .submit_classify_batch(
            ClassifyBatchPayload {
                context: RequestContext::new("tenant-1", "sms"),
                messages: vec![
                    json!({"message": "what are your hours"}),
                    json!({"message": "garbled"}),
                    json!({"message": "call me back"}),
                ],
                review_threshold: None,
            },
            None,
        )
        .await
        .unwrap();

    assert!(harness.workers.drain_one().await);

    let job = harness.queue.status(id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);

    let results = job.result.unwrap()["results"].as_array().unwrap().clone();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["status"], "ok");
    assert_eq!(results[0]["needs_review"], false);
    assert_eq!(results[1]["status"], "error");
    assert_eq!(results[1]["needs_review"], true);
    assert_eq!(results[2]["status"], "ok");
}

#[tokio::test]
async fn low_confidence_items_are_flagged_for_review() {
    let anthropic = NullLlmProvider::succeeding(
        ProviderId::Anthropic,
        r#"{"intent":"other","confidence":0.4}"#,
    );
    anthropic.push_outcome(ScriptedOutcome::Succeed(
        r#"{"intent":"question","confidence":0.95}"#.into(),
    ));
    let harness = queue_harness(HarnessBuilder::new().anthropic(anthropic));

    let id = harness
        .queue
        .submit_classify_batch(
            ClassifyBatchPayload {
                context: RequestContext::new("tenant-1", "sms"),
                messages: vec![json!({"message": "clear"}), json!({"message": "vague"})],
                review_threshold: None,
            },
            None,
        )
        .await
        .unwrap();

    assert!(harness.workers.drain_one().await);

    let job = harness.queue.status(id).await.unwrap();
    let results = job.result.unwrap()["results"].as_array().unwrap().clone();
    assert_eq!(results[0]["needs_review"], false);
    assert_eq!(results[1]["needs_review"], true);
}

#[tokio::test]
async fn failed_job_is_redelivered_then_dead_lettered() {
    let harness = queue_harness(
        HarnessBuilder::new()
            .anthropic(NullLlmProvider::failing(
                ProviderId::Anthropic,
                ProviderErrorKind::Server,
            ))
            .openai(NullLlmProvider::failing(
                ProviderId::OpenAi,
                ProviderErrorKind::Server,
            ))
            .perplexity(NullLlmProvider::failing(
                ProviderId::Perplexity,
                ProviderErrorKind::Server,
            )),
    );

    let id = harness
        .queue
        .submit_task(
            task_payload(TaskKind::SmsClassify, json!({"message": "hi"})),
            None,
        )
        .await
        .unwrap();

    // First attempt fails and is delayed for redelivery
    assert!(harness.workers.drain_one().await);
    let job = harness.queue.status(id).await.unwrap();
    assert_eq!(job.status, JobStatus::Delayed);
    assert_eq!(job.attempts, 1);
    assert!(job.error.is_some());

    // Second attempt exhausts the budget
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(harness.workers.drain_one().await);
    let job = harness.queue.status(id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.attempts, 2);

    let letters = harness.queue.dead_letters().await.unwrap();
    assert_eq!(letters.len(), 1);
    assert_eq!(letters[0].job_id, id);
    assert_eq!(letters[0].attempts, 2);
    assert!(letters[0].reason.contains("perplexity"));

    let stats = harness.queue.stats().await.unwrap();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.waiting, 0);
}

#[tokio::test]
async fn delayed_job_is_not_claimable_before_available_at() {
    // Long redelivery delay so the failed job stays out of reach
    let harness = queue_harness_with(
        HarnessBuilder::new()
            .anthropic(NullLlmProvider::failing(
                ProviderId::Anthropic,
                ProviderErrorKind::Server,
            ))
            .openai(NullLlmProvider::failing(
                ProviderId::OpenAi,
                ProviderErrorKind::Server,
            ))
            .perplexity(NullLlmProvider::failing(
                ProviderId::Perplexity,
                ProviderErrorKind::Server,
            )),
        WorkerConfig {
            retry_delay: Duration::from_secs(300),
            ..worker_config()
        },
    );

    let id = harness
        .queue
        .submit_task(
            task_payload(TaskKind::SmsClassify, json!({"message": "hi"})),
            None,
        )
        .await
        .unwrap();

    assert!(harness.workers.drain_one().await);
    assert_eq!(
        harness.queue.status(id).await.unwrap().status,
        JobStatus::Delayed
    );
    // available_at is far in the future; nothing is claimable now
    assert!(!harness.workers.drain_one().await);
}

#[tokio::test]
async fn background_workers_drain_the_queue() {
    let harness = queue_harness(HarnessBuilder::new());
    let id = harness
        .queue
        .submit_task(
            task_payload(TaskKind::ThreadSummarize, json!({"history": "a: hi\nb: hello"})),
            None,
        )
        .await
        .unwrap();

    harness.workers.start();
    let mut done = false;
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if harness.queue.status(id).await.unwrap().status == JobStatus::Completed {
            done = true;
            break;
        }
    }
    harness.workers.shutdown().await;
    assert!(done, "job did not complete within the polling window");
}
