//! Shared harness: a fully wired engine over scripted providers

use airelay_domain::ports::LlmProvider;
use airelay_domain::value_objects::{AiRequest, ProviderId, RequestContext, TaskKind};
use airelay_infrastructure::breaker::{BreakerConfig, CircuitBreakerRegistry};
use airelay_infrastructure::cache::ResponseCache;
use airelay_infrastructure::metering::UsageMeter;
use airelay_infrastructure::orchestrator::Orchestrator;
use airelay_infrastructure::prompts::PromptResolver;
use airelay_infrastructure::routing::RoutingTable;
use airelay_providers::cache::MokaCacheProvider;
use airelay_providers::llm::NullLlmProvider;
use airelay_providers::stores::{InMemoryPromptStore, InMemoryUsageStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Engine wired over in-memory collaborators, exposed for assertions
pub struct Harness {
    pub orchestrator: Arc<Orchestrator>,
    pub usage: Arc<InMemoryUsageStore>,
    pub prompts: Arc<InMemoryPromptStore>,
    pub openai: Arc<NullLlmProvider>,
    pub anthropic: Arc<NullLlmProvider>,
    pub perplexity: Arc<NullLlmProvider>,
    pub breakers: Arc<CircuitBreakerRegistry>,
}

/// Builder over the three scripted providers
pub struct HarnessBuilder {
    openai: NullLlmProvider,
    anthropic: NullLlmProvider,
    perplexity: NullLlmProvider,
    breaker_configs: HashMap<ProviderId, BreakerConfig>,
    limits: airelay_domain::value_objects::UsageLimits,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            openai: NullLlmProvider::succeeding(ProviderId::OpenAi, "openai says hello"),
            anthropic: NullLlmProvider::succeeding(ProviderId::Anthropic, "anthropic says hello"),
            perplexity: NullLlmProvider::succeeding(
                ProviderId::Perplexity,
                "perplexity found facts",
            ),
            breaker_configs: HashMap::new(),
            limits: airelay_domain::value_objects::UsageLimits::default(),
        }
    }

    pub fn openai(mut self, provider: NullLlmProvider) -> Self {
        self.openai = provider;
        self
    }

    pub fn anthropic(mut self, provider: NullLlmProvider) -> Self {
        self.anthropic = provider;
        self
    }

    pub fn perplexity(mut self, provider: NullLlmProvider) -> Self {
        self.perplexity = provider;
        self
    }

    pub fn breaker(mut self, provider: ProviderId, config: BreakerConfig) -> Self {
        self.breaker_configs.insert(provider, config);
        self
    }

    pub fn limits(mut self, limits: airelay_domain::value_objects::UsageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn build(self) -> Harness {
        let openai = Arc::new(self.openai);
        let anthropic = Arc::new(self.anthropic);
        let perplexity = Arc::new(self.perplexity);

        let providers: HashMap<ProviderId, Arc<dyn LlmProvider>> = HashMap::from([
            (ProviderId::OpenAi, Arc::clone(&openai) as _),
            (ProviderId::Anthropic, Arc::clone(&anthropic) as _),
            (ProviderId::Perplexity, Arc::clone(&perplexity) as _),
        ]);

        let usage = Arc::new(InMemoryUsageStore::new());
        let prompts = Arc::new(InMemoryPromptStore::new());
        let breakers = Arc::new(CircuitBreakerRegistry::with_configs(self.breaker_configs));
        let meter = Arc::new(UsageMeter::new(Arc::clone(&usage) as _, self.limits));
        let cache = Arc::new(ResponseCache::new(
            Arc::new(MokaCacheProvider::new()),
            Duration::from_secs(60),
        ));
        let resolver = Arc::new(PromptResolver::new(Arc::clone(&prompts) as _));

        let orchestrator = Arc::new(Orchestrator::new(
            providers,
            RoutingTable::new(),
            Arc::clone(&breakers),
            meter,
            cache,
            resolver,
        ));

        Harness {
            orchestrator,
            usage,
            prompts,
            openai,
            anthropic,
            perplexity,
            breakers,
        }
    }
}

pub fn harness() -> Harness {
    HarnessBuilder::new().build()
}

pub fn request(task: TaskKind, input: serde_json::Value) -> AiRequest {
    AiRequest::new(task, RequestContext::new("tenant-1", "sms"), input)
}
