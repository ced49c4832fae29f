//! Resilient execution pipeline
//!
//! Runs one request through quota check, cache lookup, prompt resolution
//! and the ordered provider chain. Every provider attempt is gated by the
//! circuit breaker and recorded in the usage ledger; exactly one provider
//! serves the request or the call fails with the last provider error.

use crate::breaker::CircuitBreakerRegistry;
use crate::cache::{CachedCompletion, ResponseCache};
use crate::metering::UsageMeter;
use crate::prompts::{PromptResolver, ResolvedPrompt};
use crate::routing::RoutingTable;
use airelay_domain::error::{Error, Result};
use airelay_domain::ports::LlmProvider;
use airelay_domain::value_objects::{
    AiRequest, AiResult, CompletionRequest, CompletionResponse, ProviderId, ResponseFormat,
    UsageRecord,
};
use airelay_providers::llm::pricing::cost_for;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Orchestrator over the provider map and the resilience machinery
pub struct Orchestrator {
    providers: HashMap<ProviderId, Arc<dyn LlmProvider>>,
    routing: RoutingTable,
    breakers: Arc<CircuitBreakerRegistry>,
    meter: Arc<UsageMeter>,
    cache: Arc<ResponseCache>,
    prompts: Arc<PromptResolver>,
}

impl Orchestrator {
    /// Wire the orchestrator from its collaborators
    pub fn new(
        providers: HashMap<ProviderId, Arc<dyn LlmProvider>>,
        routing: RoutingTable,
        breakers: Arc<CircuitBreakerRegistry>,
        meter: Arc<UsageMeter>,
        cache: Arc<ResponseCache>,
        prompts: Arc<PromptResolver>,
    ) -> Self {
        Self {
            providers,
            routing,
            breakers,
            meter,
            cache,
            prompts,
        }
    }

    /// Execute one request end to end
    ///
    /// Fails fast on a breached quota, serves cacheable tasks from the
    /// response cache, then walks the provider chain in strict order and
    /// returns the first success with `degraded` set when it did not come
    /// from the primary provider.
    pub async fn execute(&self, request: AiRequest) -> Result<AiResult> {
        let started = Instant::now();
        let tenant_id = request.context.tenant_id.clone();
        let trace_id = request.context.trace_id.clone();
        let task = request.task;
        debug!(
            tenant_id,
            %task,
            priority = %request.priority,
            trace_id,
            "executing request"
        );

        if !request.skip_limit_check {
            let check = self.meter.check_limits(&tenant_id).await;
            if !check.allowed {
                let dimension = check.reason.unwrap_or_else(|| "unknown".to_string());
                info!(tenant_id, %task, dimension, "request rejected by monthly quota");
                return Err(Error::quota_exceeded(
                    dimension.clone(),
                    format!("monthly {dimension} limit reached for tenant {tenant_id}"),
                ));
            }
        }

        let cacheable = self.routing.is_cacheable(task);
        if cacheable {
            if let Some(hit) = self.cache.get(&request).await {
                debug!(tenant_id, %task, trace_id, "served from response cache");
                return Ok(AiResult {
                    output: hit.output,
                    record: None,
                    provider: hit.provider,
                    model: hit.model,
                    degraded: hit.degraded,
                    usage: None,
                    cost_usd: None,
                    trace_id,
                    latency: started.elapsed(),
                    cached: true,
                });
            }
        }

        let prompt = self
            .prompts
            .resolve(&tenant_id, task, request.prompt_key.as_deref(), &request.input)
            .await;
        let route = self.routing.route(task)?;
        let chain = self.routing.provider_chain(task, request.skip_fallback)?;
        let structured = self.routing.is_structured(task);

        let mut last_error: Option<Error> = None;
        for (position, provider_id) in chain.iter().copied().enumerate() {
            let Some(adapter) = self.providers.get(&provider_id) else {
                warn!(provider = %provider_id, "no adapter registered, skipping");
                last_error = Some(Error::routing(format!(
                    "no adapter registered for provider {provider_id}"
                )));
                continue;
            };

            if let Err(err) = self.breakers.try_acquire(provider_id) {
                debug!(provider = %provider_id, trace_id, "circuit open, skipping provider");
                last_error = Some(err);
                continue;
            }

            // The primary attempt uses the prompt/route model; fallbacks
            // use the provider's cheaper fallback model.
            let model = if position == 0 {
                prompt
                    .model
                    .clone()
                    .unwrap_or_else(|| route.model.clone())
            } else {
                self.routing.fallback_model(provider_id).to_string()
            };
            let completion_request = self.build_completion_request(&prompt, model, task, structured);

            let attempt_started = Instant::now();
            match adapter.complete(&completion_request).await {
                Ok(response) => {
                    self.breakers.record_success(provider_id);
                    let result = self
                        .finish_success(
                            &request,
                            provider_id,
                            position,
                            response,
                            structured,
                            cacheable,
                            started,
                        )
                        .await;
                    return Ok(result);
                }
                Err(err) => {
                    self.breakers.record_failure(provider_id);
                    self.meter
                        .record_usage(UsageRecord {
                            tenant_id: tenant_id.clone(),
                            task,
                            provider: provider_id,
                            model: completion_request.model.clone(),
                            input_tokens: 0,
                            output_tokens: 0,
                            cost_usd: 0.0,
                            latency_ms: attempt_started.elapsed().as_millis() as u64,
                            success: false,
                            channel: request.context.channel.clone(),
                            priority: request.priority,
                            recorded_at: Utc::now(),
                        })
                        .await;
                    warn!(
                        provider = %provider_id,
                        model = completion_request.model,
                        trace_id,
                        error = %err,
                        "provider attempt failed"
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| Error::routing(format!("no provider available for task {task}"))))
    }

    fn build_completion_request(
        &self,
        prompt: &ResolvedPrompt,
        model: String,
        task: airelay_domain::value_objects::TaskKind,
        structured: bool,
    ) -> CompletionRequest {
        CompletionRequest {
            model,
            messages: prompt.messages.clone(),
            max_tokens: prompt.max_tokens.unwrap_or_else(|| self.routing.max_tokens(task)),
            temperature: prompt.temperature,
            response_format: if structured {
                ResponseFormat::Json
            } else {
                ResponseFormat::Text
            },
        }
    }

    async fn finish_success(
        &self,
        request: &AiRequest,
        provider: ProviderId,
        position: usize,
        response: CompletionResponse,
        structured: bool,
        cacheable: bool,
        started: Instant,
    ) -> AiResult {
        let usage = response.usage.unwrap_or_default();
        let cost_usd = cost_for(&response.model, &usage);
        let degraded = position > 0;

        self.meter
            .record_usage(UsageRecord {
                tenant_id: request.context.tenant_id.clone(),
                task: request.task,
                provider,
                model: response.model.clone(),
                input_tokens: usage.input_tokens,
                output_tokens: usage.output_tokens,
                cost_usd,
                latency_ms: response.latency.as_millis() as u64,
                success: true,
                channel: request.context.channel.clone(),
                priority: request.priority,
                recorded_at: Utc::now(),
            })
            .await;

        let record = if structured {
            match parse_structured(&response.content) {
                Some(value) => Some(value),
                None => {
                    warn!(
                        task = %request.task,
                        trace_id = request.context.trace_id,
                        "structured task output did not parse as JSON, returning raw text"
                    );
                    None
                }
            }
        } else {
            None
        };

        if cacheable {
            self.cache
                .put(
                    request,
                    &CachedCompletion {
                        output: response.content.clone(),
                        provider,
                        model: response.model.clone(),
                        degraded,
                    },
                )
                .await;
        }

        if degraded {
            info!(
                task = %request.task,
                provider = %provider,
                trace_id = request.context.trace_id,
                "request served by fallback provider"
            );
        }

        // Budget hints are advisory: overruns are logged, never failed
        if let Some(budget) = request.max_cost_usd {
            if cost_usd > budget {
                warn!(
                    task = %request.task,
                    trace_id = request.context.trace_id,
                    cost_usd,
                    budget,
                    "cost exceeded the request budget hint"
                );
            }
        }
        if let Some(budget_ms) = request.max_latency_ms {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            if elapsed_ms > budget_ms {
                warn!(
                    task = %request.task,
                    trace_id = request.context.trace_id,
                    elapsed_ms,
                    budget_ms,
                    "latency exceeded the request budget hint"
                );
            }
        }

        AiResult {
            output: response.content,
            record,
            provider,
            model: response.model,
            degraded,
            usage: Some(usage),
            cost_usd: Some(cost_usd),
            trace_id: request.context.trace_id.clone(),
            latency: started.elapsed(),
            cached: false,
        }
    }

    /// Breaker states for operational visibility
    pub fn breaker_states(&self) -> HashMap<ProviderId, crate::breaker::CircuitState> {
        self.breakers.all_states()
    }
}

/// Parse model output as a JSON object, tolerating prose around it
fn parse_structured(content: &str) -> Option<serde_json::Value> {
    if let Ok(value) = serde_json::from_str(content.trim()) {
        return Some(value);
    }
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&content[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::parse_structured;

    #[test]
    fn parses_bare_and_fenced_json() {
        assert!(parse_structured(r#"{"intent":"opt_out"}"#).is_some());
        let fenced = "```json\n{\"intent\": \"question\", \"confidence\": 0.8}\n```";
        let value = parse_structured(fenced).unwrap();
        assert_eq!(value["intent"], "question");
    }

    #[test]
    fn rejects_plain_prose() {
        assert!(parse_structured("the customer wants to opt out").is_none());
    }
}
