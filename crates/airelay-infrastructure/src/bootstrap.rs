//! Composition root
//!
//! Wires the whole engine from an [`AppConfig`]: the three provider
//! adapters with their tuned retry policies, the breaker registry, usage
//! meter, response cache, prompt resolver, orchestrator, and the job
//! queue with its worker pool. Store implementations are injected so the
//! same wiring serves tests (in-memory) and deployments.

use crate::breaker::CircuitBreakerRegistry;
use crate::cache::ResponseCache;
use crate::config::AppConfig;
use crate::metering::UsageMeter;
use crate::orchestrator::Orchestrator;
use crate::prompts::PromptResolver;
use crate::queue::{JobQueue, WorkerPool};
use crate::routing::RoutingTable;
use airelay_domain::error::Result;
use airelay_domain::ports::{CacheProvider, LlmProvider};
use airelay_domain::repositories::{JobStore, PromptStore, UsageStore};
use airelay_domain::value_objects::ProviderId;
use airelay_providers::cache::MokaCacheProvider;
use airelay_providers::llm::{AnthropicProvider, OpenAiProvider, PerplexityProvider};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Durable stores the engine is built over
pub struct Stores {
    /// Append-only usage ledger
    pub usage: Arc<dyn UsageStore>,
    /// Tenant prompt records
    pub prompts: Arc<dyn PromptStore>,
    /// Durable job state
    pub jobs: Arc<dyn JobStore>,
}

/// The fully wired engine
pub struct Engine {
    /// Synchronous execution entry point
    pub orchestrator: Arc<Orchestrator>,
    /// Asynchronous submission entry point
    pub queue: JobQueue,
    /// Worker pool; call `start()` to begin draining the queue
    pub workers: WorkerPool,
    /// Shared breaker registry, for operational inspection
    pub breakers: Arc<CircuitBreakerRegistry>,
    /// Shared usage meter, for summaries
    pub meter: Arc<UsageMeter>,
}

/// Build the engine from configuration and injected stores
pub fn build_engine(config: &AppConfig, stores: Stores) -> Result<Engine> {
    let http_client = reqwest::Client::builder()
        .build()
        .unwrap_or_default();

    let providers = build_providers(config, &http_client);
    let breakers = Arc::new(CircuitBreakerRegistry::with_configs(
        config.breakers.to_breaker_configs(),
    ));
    let meter = Arc::new(UsageMeter::new(
        Arc::clone(&stores.usage),
        config.limits.into(),
    ));
    let cache_backend: Arc<dyn CacheProvider> = Arc::new(MokaCacheProvider::with_config(
        config.cache.max_entries,
        Duration::from_secs(config.cache.research_ttl_secs),
    ));
    let cache = Arc::new(ResponseCache::new(
        cache_backend,
        Duration::from_secs(config.cache.research_ttl_secs),
    ));
    let prompts = Arc::new(PromptResolver::new(Arc::clone(&stores.prompts)));

    let orchestrator = Arc::new(Orchestrator::new(
        providers,
        RoutingTable::new(),
        Arc::clone(&breakers),
        Arc::clone(&meter),
        cache,
        prompts,
    ));

    let queue = JobQueue::new(Arc::clone(&stores.jobs));
    let workers = WorkerPool::new(
        Arc::clone(&stores.jobs),
        Arc::clone(&orchestrator),
        config.queue.into(),
    );

    Ok(Engine {
        orchestrator,
        queue,
        workers,
        breakers,
        meter,
    })
}

fn build_providers(
    config: &AppConfig,
    http_client: &reqwest::Client,
) -> HashMap<ProviderId, Arc<dyn LlmProvider>> {
    let openai = OpenAiProvider::new(
        config.providers.openai.api_key.clone(),
        config.providers.openai.base_url.clone(),
        http_client.clone(),
    )
    .with_policy(config.providers.openai.retry_policy());
    let anthropic = AnthropicProvider::new(
        config.providers.anthropic.api_key.clone(),
        config.providers.anthropic.base_url.clone(),
        http_client.clone(),
    )
    .with_policy(config.providers.anthropic.retry_policy());
    let perplexity = PerplexityProvider::new(
        config.providers.perplexity.api_key.clone(),
        config.providers.perplexity.base_url.clone(),
        http_client.clone(),
    )
    .with_policy(config.providers.perplexity.retry_policy());

    HashMap::from([
        (
            ProviderId::OpenAi,
            Arc::new(openai) as Arc<dyn LlmProvider>,
        ),
        (
            ProviderId::Anthropic,
            Arc::new(anthropic) as Arc<dyn LlmProvider>,
        ),
        (
            ProviderId::Perplexity,
            Arc::new(perplexity) as Arc<dyn LlmProvider>,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use airelay_providers::stores::{InMemoryJobStore, InMemoryPromptStore, InMemoryUsageStore};

    #[tokio::test]
    async fn builds_from_default_config() {
        let engine = build_engine(
            &AppConfig::default(),
            Stores {
                usage: Arc::new(InMemoryUsageStore::new()),
                prompts: Arc::new(InMemoryPromptStore::new()),
                jobs: Arc::new(InMemoryJobStore::new()),
            },
        )
        .unwrap();
        assert!(engine.queue.stats().await.unwrap().waiting == 0);
    }
}
