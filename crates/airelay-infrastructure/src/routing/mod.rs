//! Static task routing and fallback tables
//!
//! Every task has a default `(provider, model)` pair and every provider a
//! fallback order and a cheaper fallback model. The orchestrator resolves
//! the attempt chain here; adding a provider means registering an adapter
//! and extending these tables, never editing a dispatch switch.

use airelay_domain::error::{Error, Result};
use airelay_domain::value_objects::{ProviderId, TaskKind};
use std::collections::HashMap;

/// Default `(provider, model)` pair for one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Default provider for the task
    pub provider: ProviderId,
    /// Default model on that provider
    pub model: String,
}

/// Static routing configuration for all tasks and providers
pub struct RoutingTable {
    routes: HashMap<TaskKind, RouteEntry>,
    fallback_chains: HashMap<ProviderId, Vec<ProviderId>>,
    fallback_models: HashMap<ProviderId, String>,
    max_tokens: HashMap<TaskKind, u32>,
}

impl RoutingTable {
    /// Build the table with the built-in defaults
    pub fn new() -> Self {
        let mut routes = HashMap::new();
        routes.insert(
            TaskKind::SmsClassify,
            RouteEntry {
                provider: ProviderId::Anthropic,
                model: "claude-3-5-haiku-latest".to_string(),
            },
        );
        routes.insert(
            TaskKind::LeadScore,
            RouteEntry {
                provider: ProviderId::Anthropic,
                model: "claude-3-5-haiku-latest".to_string(),
            },
        );
        routes.insert(
            TaskKind::ReplyGenerate,
            RouteEntry {
                provider: ProviderId::OpenAi,
                model: "gpt-4o-mini".to_string(),
            },
        );
        routes.insert(
            TaskKind::ThreadSummarize,
            RouteEntry {
                provider: ProviderId::OpenAi,
                model: "gpt-4o-mini".to_string(),
            },
        );
        routes.insert(
            TaskKind::LeadResearch,
            RouteEntry {
                provider: ProviderId::Perplexity,
                model: "sonar-pro".to_string(),
            },
        );

        let mut fallback_chains = HashMap::new();
        fallback_chains.insert(
            ProviderId::OpenAi,
            vec![ProviderId::Anthropic, ProviderId::Perplexity],
        );
        fallback_chains.insert(
            ProviderId::Anthropic,
            vec![ProviderId::OpenAi, ProviderId::Perplexity],
        );
        fallback_chains.insert(
            ProviderId::Perplexity,
            vec![ProviderId::OpenAi, ProviderId::Anthropic],
        );

        let mut fallback_models = HashMap::new();
        fallback_models.insert(ProviderId::OpenAi, "gpt-4o-mini".to_string());
        fallback_models.insert(ProviderId::Anthropic, "claude-3-5-haiku-latest".to_string());
        fallback_models.insert(ProviderId::Perplexity, "sonar".to_string());

        let mut max_tokens = HashMap::new();
        max_tokens.insert(TaskKind::SmsClassify, 256);
        max_tokens.insert(TaskKind::LeadScore, 512);
        max_tokens.insert(TaskKind::ReplyGenerate, 1024);
        max_tokens.insert(TaskKind::ThreadSummarize, 1024);
        max_tokens.insert(TaskKind::LeadResearch, 4096);

        Self {
            routes,
            fallback_chains,
            fallback_models,
            max_tokens,
        }
    }

    /// Override the default route for a task
    pub fn with_route(mut self, task: TaskKind, entry: RouteEntry) -> Self {
        self.routes.insert(task, entry);
        self
    }

    /// Override the fallback chain for a provider
    pub fn with_fallback_chain(mut self, provider: ProviderId, chain: Vec<ProviderId>) -> Self {
        self.fallback_chains.insert(provider, chain);
        self
    }

    /// Default `(provider, model)` for a task
    pub fn route(&self, task: TaskKind) -> Result<&RouteEntry> {
        self.routes
            .get(&task)
            .ok_or_else(|| Error::routing(format!("no routing entry for task {task}")))
    }

    /// The ordered provider chain attempted for a task
    ///
    /// `[default, ...fallbacks]`, or just `[default]` when the caller
    /// requested `skip_fallback`.
    pub fn provider_chain(&self, task: TaskKind, skip_fallback: bool) -> Result<Vec<ProviderId>> {
        let default = self.route(task)?.provider;
        let mut chain = vec![default];
        if !skip_fallback {
            if let Some(fallbacks) = self.fallback_chains.get(&default) {
                chain.extend(fallbacks.iter().copied().filter(|p| *p != default));
            }
        }
        Ok(chain)
    }

    /// Cheaper/faster model used when a provider serves as a fallback
    pub fn fallback_model(&self, provider: ProviderId) -> &str {
        self.fallback_models
            .get(&provider)
            .map(String::as_str)
            .unwrap_or("gpt-4o-mini")
    }

    /// Default max-token budget for a task
    pub fn max_tokens(&self, task: TaskKind) -> u32 {
        self.max_tokens.get(&task).copied().unwrap_or(1024)
    }

    /// Whether responses for this task are idempotent and cacheable
    pub fn is_cacheable(&self, task: TaskKind) -> bool {
        matches!(task, TaskKind::LeadResearch)
    }

    /// Whether the task's output is parsed as a structured record
    pub fn is_structured(&self, task: TaskKind) -> bool {
        matches!(task, TaskKind::SmsClassify | TaskKind::LeadScore)
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}
