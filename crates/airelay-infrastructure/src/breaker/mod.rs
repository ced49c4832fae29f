//! Per-provider circuit breaker registry
//!
//! Tracks provider health as a closed/open/half-open state machine and
//! gates every adapter call. Providers are independent: the registry
//! serializes transitions per provider key, never globally.
//!
//! Transitions are the only mutation path; there is no external reset.

use airelay_domain::error::{Error, Result};
use airelay_domain::value_objects::ProviderId;
use dashmap::DashMap;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Observable breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through; failures are counted
    Closed,
    /// Calls are rejected without touching the network
    Open,
    /// A limited number of probe calls are admitted
    HalfOpen,
}

/// Per-provider breaker tuning
#[derive(Debug, Clone, Copy)]
pub struct BreakerConfig {
    /// Consecutive failures that open the breaker
    pub failure_threshold: u32,
    /// Time an open breaker waits before admitting probes
    pub reset_timeout: Duration,
    /// Consecutive half-open successes that close the breaker
    pub success_threshold: u32,
    /// Probe calls admitted concurrently while half-open
    pub half_open_max_probes: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: crate::constants::CIRCUIT_BREAKER_FAILURE_THRESHOLD,
            reset_timeout: Duration::from_secs(
                crate::constants::CIRCUIT_BREAKER_RESET_TIMEOUT_SECS,
            ),
            success_threshold: crate::constants::CIRCUIT_BREAKER_SUCCESS_THRESHOLD,
            half_open_max_probes: crate::constants::CIRCUIT_BREAKER_HALF_OPEN_PROBES,
        }
    }
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    opened_at: Option<Instant>,
    probes_in_flight: u32,
}

impl Default for BreakerState {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            consecutive_successes: 0,
            opened_at: None,
            probes_in_flight: 0,
        }
    }
}

/// Registry of per-provider circuit breakers
///
/// Created lazily per provider key on first use; lives for the process
/// lifetime. Owned by the composition root and shared behind an `Arc`.
pub struct CircuitBreakerRegistry {
    breakers: DashMap<ProviderId, BreakerState>,
    configs: HashMap<ProviderId, BreakerConfig>,
    default_config: BreakerConfig,
}

impl CircuitBreakerRegistry {
    /// Create a registry where every provider uses the default config
    pub fn new() -> Self {
        Self {
            breakers: DashMap::new(),
            configs: HashMap::new(),
            default_config: BreakerConfig::default(),
        }
    }

    /// Create a registry with per-provider configs
    pub fn with_configs(configs: HashMap<ProviderId, BreakerConfig>) -> Self {
        Self {
            breakers: DashMap::new(),
            configs,
            default_config: BreakerConfig::default(),
        }
    }

    fn config_for(&self, provider: ProviderId) -> BreakerConfig {
        self.configs
            .get(&provider)
            .copied()
            .unwrap_or(self.default_config)
    }

    /// Ask whether a call to the provider may proceed
    ///
    /// An open breaker whose reset timeout has elapsed transitions to
    /// half-open and admits the caller as a probe instead of rejecting.
    pub fn try_acquire(&self, provider: ProviderId) -> Result<()> {
        let config = self.config_for(provider);
        let mut entry = self.breakers.entry(provider).or_default();
        match entry.state {
            CircuitState::Closed => Ok(()),
            CircuitState::Open => {
                let elapsed = entry
                    .opened_at
                    .map(|at| at.elapsed())
                    .unwrap_or(Duration::ZERO);
                if elapsed >= config.reset_timeout {
                    info!(provider = %provider, "circuit half-open, admitting probe");
                    entry.state = CircuitState::HalfOpen;
                    entry.consecutive_successes = 0;
                    entry.probes_in_flight = 1;
                    Ok(())
                } else {
                    Err(Error::circuit_open(provider.as_str()))
                }
            }
            CircuitState::HalfOpen => {
                if entry.probes_in_flight < config.half_open_max_probes {
                    entry.probes_in_flight += 1;
                    Ok(())
                } else {
                    Err(Error::circuit_open(provider.as_str()))
                }
            }
        }
    }

    /// Record a successful call outcome
    pub fn record_success(&self, provider: ProviderId) {
        let config = self.config_for(provider);
        let mut entry = self.breakers.entry(provider).or_default();
        match entry.state {
            CircuitState::Closed => {
                entry.consecutive_failures = 0;
            }
            CircuitState::HalfOpen => {
                entry.probes_in_flight = entry.probes_in_flight.saturating_sub(1);
                entry.consecutive_successes += 1;
                if entry.consecutive_successes >= config.success_threshold {
                    info!(provider = %provider, "circuit closed after successful probes");
                    entry.state = CircuitState::Closed;
                    entry.consecutive_failures = 0;
                    entry.consecutive_successes = 0;
                    entry.opened_at = None;
                    entry.probes_in_flight = 0;
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a failed call outcome
    pub fn record_failure(&self, provider: ProviderId) {
        let config = self.config_for(provider);
        let mut entry = self.breakers.entry(provider).or_default();
        match entry.state {
            CircuitState::Closed => {
                entry.consecutive_failures += 1;
                if entry.consecutive_failures >= config.failure_threshold {
                    warn!(
                        provider = %provider,
                        failures = entry.consecutive_failures,
                        "circuit opened"
                    );
                    entry.state = CircuitState::Open;
                    entry.opened_at = Some(Instant::now());
                }
            }
            CircuitState::HalfOpen => {
                // Any failure while probing reopens and resets the clock
                warn!(provider = %provider, "probe failed, circuit reopened");
                entry.state = CircuitState::Open;
                entry.opened_at = Some(Instant::now());
                entry.consecutive_successes = 0;
                entry.probes_in_flight = 0;
            }
            CircuitState::Open => {}
        }
    }

    /// Current state for a provider, for observability
    pub fn state(&self, provider: ProviderId) -> CircuitState {
        self.breakers
            .get(&provider)
            .map(|entry| entry.state)
            .unwrap_or(CircuitState::Closed)
    }

    /// Snapshot of all tracked breaker states
    pub fn all_states(&self) -> HashMap<ProviderId, CircuitState> {
        self.breakers
            .iter()
            .map(|entry| (*entry.key(), entry.value().state))
            .collect()
    }
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
