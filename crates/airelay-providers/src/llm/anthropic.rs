//! Anthropic messages API adapter
//!
//! Implements the `LlmProvider` port against the Anthropic messages API.
//! The system message travels in the top-level `system` field rather than
//! the messages array; JSON output is requested via a system-side
//! instruction since the API has no response_format parameter.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use airelay_domain::error::{Error, ProviderErrorKind, Result};
use airelay_domain::ports::LlmProvider;
use airelay_domain::value_objects::{
    CompletionRequest, CompletionResponse, ProviderId, ResponseFormat, Role, TokenUsage,
};

use crate::constants::{
    ANTHROPIC_BASE_URL, ANTHROPIC_VERSION, COMPLETION_INITIAL_BACKOFF_MS, COMPLETION_MAX_RETRIES,
    COMPLETION_TIMEOUT_SECS, CONTENT_TYPE_JSON,
};
use crate::llm::http::{check_and_parse, transport_error};
use crate::llm::retry::{call_with_retry, RetryPolicy};

/// Anthropic provider adapter
pub struct AnthropicProvider {
    api_key: String,
    base_url: Option<String>,
    http_client: Client,
    policy: RetryPolicy,
}

impl AnthropicProvider {
    /// Create an adapter with the tuned default retry policy
    pub fn new(api_key: String, base_url: Option<String>, http_client: Client) -> Self {
        Self {
            api_key,
            base_url,
            http_client,
            policy: RetryPolicy {
                max_retries: COMPLETION_MAX_RETRIES,
                initial_delay: Duration::from_millis(COMPLETION_INITIAL_BACKOFF_MS),
                request_timeout: Duration::from_secs(COMPLETION_TIMEOUT_SECS),
            },
        }
    }

    /// Override the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get the base URL for this provider
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(ANTHROPIC_BASE_URL)
    }

    /// Send one network attempt and parse the response body
    async fn send_once(&self, request: &CompletionRequest) -> Result<(String, Option<TokenUsage>, String)> {
        let mut system = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if request.response_format == ResponseFormat::Json {
            system.push_str("\nRespond with a single JSON object and nothing else.");
        }

        let messages = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        Role::User => "user",
                        _ => "assistant",
                    },
                    "content": m.content,
                })
            })
            .collect::<Vec<_>>();

        let payload = serde_json::json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "system": system,
            "messages": messages,
        });

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url()))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", CONTENT_TYPE_JSON)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(ProviderId::Anthropic, e))?;

        let body = check_and_parse(ProviderId::Anthropic, response).await?;

        let content = body["content"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                Error::provider(
                    "anthropic",
                    "response missing content[0].text",
                    ProviderErrorKind::Server,
                )
            })?
            .to_string();

        let usage = body.get("usage").map(|u| TokenUsage {
            input_tokens: u["input_tokens"].as_u64().unwrap_or(0),
            output_tokens: u["output_tokens"].as_u64().unwrap_or(0),
        });

        let model = body["model"]
            .as_str()
            .unwrap_or(&request.model)
            .to_string();

        Ok((content, usage, model))
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        if self.api_key.is_empty() {
            return Err(Error::config("Anthropic API key not configured"));
        }

        let started = Instant::now();
        let (content, usage, model) = call_with_retry(ProviderId::Anthropic, &self.policy, || {
            self.send_once(request)
        })
        .await?;

        Ok(CompletionResponse {
            content,
            usage,
            model,
            latency: started.elapsed(),
        })
    }
}
