//! Infrastructure layer for airelay
//!
//! Composes the domain ports and provider adapters into the routing
//! engine: circuit breaking, task routing with fallback, usage metering
//! with quota enforcement, prompt resolution, response caching, the
//! synchronous orchestrator, and the durable job queue with its worker
//! pool and callback delivery.

/// Composition root wiring the engine from configuration
pub mod bootstrap;
/// Per-provider circuit breaker registry
pub mod breaker;
/// Research response cache
pub mod cache;
/// Configuration loading and types
pub mod config;
/// Infrastructure constants
pub mod constants;
/// Structured logging with tracing
pub mod logging;
/// Usage metering and quota enforcement
pub mod metering;
/// Orchestrator routing engine
pub mod orchestrator;
/// Prompt resolution with tenant overrides
pub mod prompts;
/// Durable job queue, worker pool, callback delivery
pub mod queue;
/// Static task routing and fallback tables
pub mod routing;

pub use bootstrap::{build_engine, Engine, Stores};
pub use breaker::CircuitBreakerRegistry;
pub use cache::ResponseCache;
pub use config::AppConfig;
pub use metering::UsageMeter;
pub use orchestrator::Orchestrator;
pub use prompts::PromptResolver;
pub use queue::{JobQueue, WorkerPool};
pub use routing::RoutingTable;
