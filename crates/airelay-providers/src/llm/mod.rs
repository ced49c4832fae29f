//! LLM backend adapters
//!
//! One adapter per external backend, all sharing the retry/backoff and
//! HTTP classification plumbing in [`retry`] and [`http`]. Each adapter
//! carries tuned defaults reflecting its latency/cost profile.

/// Anthropic messages API adapter
pub mod anthropic;
/// HTTP status classification shared by all adapters
pub mod http;
/// Scripted provider for testing
pub mod null;
/// OpenAI chat completions adapter
pub mod openai;
/// Perplexity web-search-backed adapter
pub mod perplexity;
/// Static per-model price table
pub mod pricing;
/// Shared retry/backoff/timeout plumbing
pub mod retry;

pub use anthropic::AnthropicProvider;
pub use null::NullLlmProvider;
pub use openai::OpenAiProvider;
pub use perplexity::PerplexityProvider;
pub use pricing::cost_for;
pub use retry::RetryPolicy;
