//! Orchestrator routing, fallback and resilience scenarios

use super::support::{harness, request, HarnessBuilder};
use airelay_domain::error::{Error, ProviderErrorKind};
use airelay_domain::repositories::PromptStore;
use airelay_domain::value_objects::{PromptRecord, ProviderId, TaskKind, UsageLimits};
use airelay_infrastructure::breaker::{BreakerConfig, CircuitState};
use airelay_providers::llm::null::ScriptedOutcome;
use airelay_providers::llm::NullLlmProvider;
use chrono::Utc;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn primary_provider_serves_without_degradation() {
    let harness = HarnessBuilder::new()
        .anthropic(NullLlmProvider::succeeding(
            ProviderId::Anthropic,
            r#"{"intent":"question","confidence":0.9}"#,
        ))
        .build();

    let result = harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "hi"})))
        .await
        .unwrap();

    assert_eq!(result.provider, ProviderId::Anthropic);
    assert_eq!(result.model, "claude-3-5-haiku-latest");
    assert!(!result.degraded);
    assert!(!result.cached);
    assert_eq!(result.record.as_ref().unwrap()["intent"], "question");
    assert!(result.cost_usd.unwrap() > 0.0);

    let records = harness.usage.records().await;
    assert_eq!(records.len(), 1);
    assert!(records[0].success);
    assert_eq!(records[0].total_tokens(), 150);
}

#[tokio::test]
async fn exceeded_budget_hints_are_advisory_only() {
    let harness = harness();

    let mut req = request(TaskKind::SmsClassify, json!({"message": "hi"}));
    // Impossible budgets: any real call overruns both
    req.max_latency_ms = Some(0);
    req.max_cost_usd = Some(0.0);

    let result = harness.orchestrator.execute(req).await.unwrap();
    assert_eq!(result.provider, ProviderId::Anthropic);
    assert!(result.cost_usd.unwrap() > 0.0);
}

#[tokio::test]
async fn failed_primary_falls_back_in_order_and_flags_degraded() {
    let harness = HarnessBuilder::new()
        .anthropic(NullLlmProvider::failing(
            ProviderId::Anthropic,
            ProviderErrorKind::Server,
        ))
        .build();

    let result = harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "hi"})))
        .await
        .unwrap();

    // Chain for SmsClassify is Anthropic -> OpenAI -> Perplexity
    assert_eq!(result.provider, ProviderId::OpenAi);
    assert_eq!(result.model, "gpt-4o-mini");
    assert!(result.degraded);
    assert_eq!(harness.anthropic.call_count(), 1);
    assert_eq!(harness.openai.call_count(), 1);
    assert_eq!(harness.perplexity.call_count(), 0);

    // One failed fact for the primary, one successful for the fallback
    let records = harness.usage.records().await;
    assert_eq!(records.len(), 2);
    assert!(!records[0].success);
    assert_eq!(records[0].provider, ProviderId::Anthropic);
    assert_eq!(records[0].cost_usd, 0.0);
    assert!(records[1].success);
}

#[tokio::test]
async fn skip_fallback_attempts_only_the_default_provider() {
    let harness = HarnessBuilder::new()
        .anthropic(NullLlmProvider::failing(
            ProviderId::Anthropic,
            ProviderErrorKind::BadRequest,
        ))
        .build();

    let mut req = request(TaskKind::SmsClassify, json!({"message": "hi"}));
    req.skip_fallback = true;
    let err = harness.orchestrator.execute(req).await.unwrap_err();

    assert!(matches!(err, Error::Provider { .. }));
    assert_eq!(harness.openai.call_count(), 0);
    assert_eq!(harness.perplexity.call_count(), 0);
}

#[tokio::test]
async fn exhausted_chain_returns_the_last_provider_error() {
    let harness = HarnessBuilder::new()
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
            ProviderErrorKind::RateLimited,
        ))
        .build();

    let err = harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "hi"})))
        .await
        .unwrap_err();

    match err {
        Error::Provider { provider, kind, .. } => {
            assert_eq!(provider, "perplexity");
            assert_eq!(kind, ProviderErrorKind::RateLimited);
        }
        other => panic!("expected provider error, got {other}"),
    }
    // Three failed facts, no successful one
    let records = harness.usage.records().await;
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| !r.success));
}

#[tokio::test]
async fn quota_breach_fails_fast_without_provider_calls() {
    let harness = HarnessBuilder::new()
        .limits(UsageLimits {
            tokens_per_month: 100,
            requests_per_month: 1_000,
            cost_per_month_usd: 100.0,
        })
        .build();

    // Burn the token budget
    harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "one"})))
        .await
        .unwrap();

    let err = harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "two"})))
        .await
        .unwrap_err();

    match err {
        Error::QuotaExceeded { dimension, .. } => assert_eq!(dimension, "tokens"),
        other => panic!("expected quota error, got {other}"),
    }
    assert_eq!(harness.anthropic.call_count(), 1);
}

#[tokio::test]
async fn skip_limit_check_bypasses_a_breached_quota() {
    let harness = HarnessBuilder::new()
        .limits(UsageLimits {
            tokens_per_month: 100,
            requests_per_month: 1_000,
            cost_per_month_usd: 100.0,
        })
        .build();

    harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "one"})))
        .await
        .unwrap();

    let mut req = request(TaskKind::SmsClassify, json!({"message": "two"}));
    req.skip_limit_check = true;
    assert!(harness.orchestrator.execute(req).await.is_ok());
}

#[tokio::test]
async fn research_is_served_from_cache_on_repeat() {
    let harness = harness();
    let input = json!({"subject": "Acme Corp"});

    let first = harness
        .orchestrator
        .execute(request(TaskKind::LeadResearch, input.clone()))
        .await
        .unwrap();
    assert!(!first.cached);
    assert_eq!(first.provider, ProviderId::Perplexity);

    let second = harness
        .orchestrator
        .execute(request(TaskKind::LeadResearch, input))
        .await
        .unwrap();
    assert!(second.cached);
    assert_eq!(second.output, first.output);
    assert_eq!(second.provider, ProviderId::Perplexity);
    assert!(second.usage.is_none());
    assert!(second.cost_usd.is_none());
    assert_eq!(harness.perplexity.call_count(), 1);

    // Cached replies do not add usage facts
    assert_eq!(harness.usage.records().await.len(), 1);
}

#[tokio::test]
async fn classification_is_never_cached() {
    let harness = harness();
    let input = json!({"message": "same text"});

    harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, input.clone()))
        .await
        .unwrap();
    let second = harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, input))
        .await
        .unwrap();

    assert!(!second.cached);
    assert_eq!(harness.anthropic.call_count(), 2);
}

#[tokio::test]
async fn open_breaker_skips_the_provider_entirely() {
    let harness = HarnessBuilder::new()
        .anthropic(NullLlmProvider::failing(
            ProviderId::Anthropic,
            ProviderErrorKind::Server,
        ))
        .breaker(
            ProviderId::Anthropic,
            BreakerConfig {
                failure_threshold: 1,
                reset_timeout: Duration::from_secs(60),
                success_threshold: 1,
                half_open_max_probes: 1,
            },
        )
        .build();

    // First call trips the breaker and falls back
    let first = harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "a"})))
        .await
        .unwrap();
    assert!(first.degraded);
    assert_eq!(
        harness.breakers.state(ProviderId::Anthropic),
        CircuitState::Open
    );

    // Second call must not touch the broken provider
    let second = harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "b"})))
        .await
        .unwrap();
    assert!(second.degraded);
    assert_eq!(second.provider, ProviderId::OpenAi);
    assert_eq!(harness.anthropic.call_count(), 1);
}

#[tokio::test]
async fn unparseable_structured_output_returns_raw_text() {
    let harness = HarnessBuilder::new()
        .anthropic(NullLlmProvider::succeeding(
            ProviderId::Anthropic,
            "I think this is a question",
        ))
        .build();

    let result = harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "hi"})))
        .await
        .unwrap();

    assert!(result.record.is_none());
    assert_eq!(result.output, "I think this is a question");
}

#[tokio::test]
async fn tenant_prompt_model_override_is_used_for_the_primary_attempt() {
    let harness = harness();
    harness
        .prompts
        .upsert(PromptRecord {
            tenant_id: "tenant-1".into(),
            key: "sms_classify".into(),
            version: 1,
            system_prompt: "classify for tenant-1".into(),
            user_template: Some("{message}".into()),
            model: Some("claude-3-5-sonnet-latest".into()),
            temperature: None,
            max_tokens: None,
            active: true,
            usage_count: 0,
            updated_at: Utc::now(),
        })
        .await
        .unwrap();

    let result = harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "hi"})))
        .await
        .unwrap();

    assert_eq!(result.model, "claude-3-5-sonnet-latest");
    assert!(!result.degraded);
}

#[tokio::test]
async fn metering_outage_fails_open() {
    let harness = harness();
    harness.usage.set_unavailable(true);

    let result = harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "hi"})))
        .await
        .unwrap();
    assert_eq!(result.provider, ProviderId::Anthropic);
}

#[tokio::test]
async fn scripted_recovery_stops_degrading() {
    let anthropic = NullLlmProvider::succeeding(ProviderId::Anthropic, r#"{"ok":true}"#);
    anthropic.push_outcome(ScriptedOutcome::Fail(ProviderErrorKind::RateLimited));
    let harness = HarnessBuilder::new().anthropic(anthropic).build();

    let first = harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "a"})))
        .await
        .unwrap();
    assert!(first.degraded);

    let second = harness
        .orchestrator
        .execute(request(TaskKind::SmsClassify, json!({"message": "b"})))
        .await
        .unwrap();
    assert!(!second.degraded);
    assert_eq!(second.provider, ProviderId::Anthropic);
}
