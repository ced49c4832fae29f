//! Provider adapter call contract
//!
//! The uniform shape every LLM backend is wrapped behind. Adapters own
//! per-call timeout, retry/backoff and cost calculation; callers see only
//! these types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier of an external LLM backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// OpenAI chat completions
    OpenAi,
    /// Anthropic messages API
    Anthropic,
    /// Perplexity web-search-backed completions
    Perplexity,
}

impl ProviderId {
    /// Stable wire name, used for breaker keys and usage attribution
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Perplexity => "perplexity",
        }
    }

    /// All known providers
    pub fn all() -> &'static [ProviderId] {
        &[Self::OpenAi, Self::Anthropic, Self::Perplexity]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// End-user content
    User,
    /// Model output
    Assistant,
}

/// One message in a completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role
    pub role: Role,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Build a system message
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Build a user message
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Requested shape of the model output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free-form text
    #[default]
    Text,
    /// A single JSON object
    Json,
}

/// Options for one provider adapter call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier understood by the backend
    pub model: String,
    /// Conversation payload (system + user for orchestrated calls)
    pub messages: Vec<ChatMessage>,
    /// Hard cap on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Requested output shape
    pub response_format: ResponseFormat,
}

/// Token counts reported by the backend for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt-side tokens
    pub input_tokens: u64,
    /// Completion-side tokens
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Total tokens for quota accounting
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Result of one successful provider adapter call
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text
    pub content: String,
    /// Token usage, when the backend reports it
    pub usage: Option<TokenUsage>,
    /// Model that actually served the call
    pub model: String,
    /// Wall-clock latency of the call, including adapter retries
    pub latency: Duration,
}
