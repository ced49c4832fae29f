//! OpenAI chat completions adapter
//!
//! Implements the `LlmProvider` port against the OpenAI chat completions
//! API. Pure completion profile: 30 s per-attempt timeout, 3 retries,
//! 500 ms initial backoff.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use airelay_domain::error::{Error, ProviderErrorKind, Result};
use airelay_domain::ports::LlmProvider;
use airelay_domain::value_objects::{
    CompletionRequest, CompletionResponse, ProviderId, ResponseFormat, Role, TokenUsage,
};

use crate::constants::{
    COMPLETION_INITIAL_BACKOFF_MS, COMPLETION_MAX_RETRIES, COMPLETION_TIMEOUT_SECS,
    CONTENT_TYPE_JSON, OPENAI_BASE_URL,
};
use crate::llm::http::{check_and_parse, transport_error};
use crate::llm::retry::{call_with_retry, RetryPolicy};

/// OpenAI provider adapter
pub struct OpenAiProvider {
    api_key: String,
    base_url: Option<String>,
    http_client: Client,
    policy: RetryPolicy,
}

impl OpenAiProvider {
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
        self.base_url.as_deref().unwrap_or(OPENAI_BASE_URL)
    }

    /// Send one network attempt and parse the response body
    async fn send_once(&self, request: &CompletionRequest) -> Result<(String, Option<TokenUsage>, String)> {
        let mut payload = serde_json::json!({
            "model": request.model,
            "messages": request.messages.iter().map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        Role::System => "system",
                        Role::User => "user",
                        Role::Assistant => "assistant",
                    },
                    "content": m.content,
                })
            }).collect::<Vec<_>>(),
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });
        if request.response_format == ResponseFormat::Json {
            payload["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url()))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(ProviderId::OpenAi, e))?;

        let body = check_and_parse(ProviderId::OpenAi, response).await?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                Error::provider(
                    "openai",
                    "response missing choices[0].message.content",
                    ProviderErrorKind::Server,
                )
            })?
            .to_string();

        let usage = body.get("usage").map(|u| TokenUsage {
            input_tokens: u["prompt_tokens"].as_u64().unwrap_or(0),
            output_tokens: u["completion_tokens"].as_u64().unwrap_or(0),
        });

        let model = body["model"]
            .as_str()
            .unwrap_or(&request.model)
            .to_string();

        Ok((content, usage, model))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        if self.api_key.is_empty() {
            return Err(Error::config("OpenAI API key not configured"));
        }

        let started = Instant::now();
        let (content, usage, model) =
            call_with_retry(ProviderId::OpenAi, &self.policy, || self.send_once(request)).await?;

        Ok(CompletionResponse {
            content,
            usage,
            model,
            latency: started.elapsed(),
        })
    }
}
