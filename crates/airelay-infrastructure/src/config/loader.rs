//! Configuration loader
//!
//! Merges built-in defaults, an optional TOML file and environment
//! variables with Figment. Later sources override earlier ones.

use crate::config::AppConfig;
use crate::constants::{CONFIG_ENV_PREFIX, DEFAULT_CONFIG_FILENAME};
use airelay_domain::error::{Error, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a loader with the default file lookup and env prefix
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set an explicit configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Merge order (later overrides earlier):
    /// 1. `AppConfig::default()`
    /// 2. TOML file (explicit path, else `airelay.toml` in the working
    ///    directory when present)
    /// 3. Environment variables, e.g. `AIRELAY_QUEUE_CONCURRENCY`
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        match &self.config_path {
            Some(path) => {
                if path.exists() {
                    info!(path = %path.display(), "loading configuration file");
                    figment = figment.merge(Toml::file(path));
                } else {
                    warn!(path = %path.display(), "configuration file not found, using defaults");
                }
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    info!(path = %default_path.display(), "loading configuration file");
                    figment = figment.merge(Toml::file(default_path));
                }
            }
        }

        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("_"));

        let config: AppConfig = figment
            .extract()
            .map_err(|err| Error::config(format!("failed to extract configuration: {err}")))?;
        validate(&config)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.cache.research_ttl_secs == 0 {
        return Err(Error::config("cache research_ttl_secs cannot be 0"));
    }
    if config.queue.concurrency == 0 {
        return Err(Error::config("queue concurrency cannot be 0"));
    }
    if config.queue.max_attempts == 0 {
        return Err(Error::config("queue max_attempts cannot be 0"));
    }
    if !(0.0..=1.0).contains(&config.queue.review_threshold) {
        return Err(Error::config(
            "queue review_threshold must be between 0.0 and 1.0",
        ));
    }
    if config.limits.tokens_per_month == 0 {
        return Err(Error::config("limits tokens_per_month cannot be 0"));
    }
    Ok(())
}
