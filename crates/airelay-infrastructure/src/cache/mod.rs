//! Content-addressed response cache for research tasks
//!
//! Keys are derived from the tenant, task and a canonical hash of the
//! request input, so the same question asked twice within the TTL is
//! served without a provider call. An explicit idempotency key replaces
//! the content hash. Cache failures never fail the request.

use airelay_domain::error::Result;
use airelay_domain::ports::{CacheEntryConfig, CacheProvider};
use airelay_domain::value_objects::{AiRequest, ProviderId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// The slice of a result worth replaying from cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedCompletion {
    /// Raw model output
    pub output: String,
    /// Provider that originally served the call
    pub provider: ProviderId,
    /// Model that originally served the call
    pub model: String,
    /// Whether the original call was degraded
    pub degraded: bool,
}

/// Response cache over a pluggable cache backend
pub struct ResponseCache {
    backend: Arc<dyn CacheProvider>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache with the given entry TTL
    pub fn new(backend: Arc<dyn CacheProvider>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Derive the cache key for a request
    ///
    /// An idempotency key wins over the content hash; otherwise the key is
    /// a SHA-256 of the canonicalized input, scoped by tenant and task.
    pub fn key_for(request: &AiRequest) -> String {
        let tenant = &request.context.tenant_id;
        let task = request.task.as_str();
        match &request.idempotency_key {
            Some(idem) => format!("res:{tenant}:{task}:idem:{idem}"),
            None => {
                let mut hasher = Sha256::new();
                hash_value(&mut hasher, &request.input);
                let digest = hex::encode(hasher.finalize());
                format!("res:{tenant}:{task}:{digest}")
            }
        }
    }

    /// Look up a cached completion; misses and backend errors both return None
    pub async fn get(&self, request: &AiRequest) -> Option<CachedCompletion> {
        let key = Self::key_for(request);
        match self.backend.get_json(&key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(hit) => {
                    debug!(key, "response cache hit");
                    Some(hit)
                }
                Err(err) => {
                    warn!(key, error = %err, "discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(key, error = %err, "response cache read failed");
                None
            }
        }
    }

    /// Store a completion; backend errors are logged and swallowed
    pub async fn put(&self, request: &AiRequest, entry: &CachedCompletion) {
        let key = Self::key_for(request);
        let raw = match serde_json::to_string(entry) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "failed to encode cache entry");
                return;
            }
        };
        let config = CacheEntryConfig::new().with_ttl(self.ttl);
        if let Err(err) = self.backend.set_json(&key, &raw, config).await {
            warn!(key, error = %err, "response cache write failed");
        }
    }

    /// Drop every cached entry
    pub async fn clear(&self) -> Result<()> {
        self.backend.clear().await
    }
}

/// Feed a JSON value into the hasher with object keys sorted
///
/// serde_json preserves insertion order, so two semantically identical
/// payloads could otherwise hash differently.
fn hash_value(hasher: &mut Sha256, value: &serde_json::Value) {
    match value {
        serde_json::Value::Null => hasher.update(b"n"),
        serde_json::Value::Bool(b) => {
            hasher.update(b"b");
            hasher.update([u8::from(*b)]);
        }
        serde_json::Value::Number(n) => {
            hasher.update(b"#");
            hasher.update(n.to_string().as_bytes());
        }
        serde_json::Value::String(s) => {
            hasher.update(b"s");
            hasher.update(s.len().to_le_bytes());
            hasher.update(s.as_bytes());
        }
        serde_json::Value::Array(items) => {
            hasher.update(b"[");
            for item in items {
                hash_value(hasher, item);
            }
            hasher.update(b"]");
        }
        serde_json::Value::Object(map) => {
            hasher.update(b"{");
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                hasher.update(key.len().to_le_bytes());
                hasher.update(key.as_bytes());
                hash_value(hasher, &map[key]);
            }
            hasher.update(b"}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airelay_domain::value_objects::{RequestContext, TaskKind};
    use airelay_providers::cache::MokaCacheProvider;
    use serde_json::json;

    fn request(input: serde_json::Value) -> AiRequest {
        AiRequest::new(
            TaskKind::LeadResearch,
            RequestContext::new("t1", "web"),
            input,
        )
    }

    #[test]
    fn key_is_stable_across_object_key_order() {
        let a = request(json!({"name": "Acme", "domain": "acme.io"}));
        let b = request(json!({"domain": "acme.io", "name": "Acme"}));
        assert_eq!(ResponseCache::key_for(&a), ResponseCache::key_for(&b));
    }

    #[test]
    fn key_differs_by_tenant_and_input() {
        let a = request(json!({"name": "Acme"}));
        let b = request(json!({"name": "Initech"}));
        assert_ne!(ResponseCache::key_for(&a), ResponseCache::key_for(&b));

        let mut c = request(json!({"name": "Acme"}));
        c.context.tenant_id = "t2".into();
        assert_ne!(ResponseCache::key_for(&a), ResponseCache::key_for(&c));
    }

    #[test]
    fn idempotency_key_overrides_content_hash() {
        let mut a = request(json!({"name": "Acme"}));
        a.idempotency_key = Some("job-42".into());
        let mut b = request(json!({"name": "Initech"}));
        b.idempotency_key = Some("job-42".into());
        assert_eq!(ResponseCache::key_for(&a), ResponseCache::key_for(&b));
    }

    #[tokio::test]
    async fn round_trips_through_the_backend() {
        let cache = ResponseCache::new(
            Arc::new(MokaCacheProvider::new()),
            Duration::from_secs(60),
        );
        let req = request(json!({"name": "Acme"}));
        assert!(cache.get(&req).await.is_none());

        cache
            .put(
                &req,
                &CachedCompletion {
                    output: "Acme builds anvils.".into(),
                    provider: ProviderId::Perplexity,
                    model: "sonar".into(),
                    degraded: false,
                },
            )
            .await;

        let hit = cache.get(&req).await.unwrap();
        assert_eq!(hit.output, "Acme builds anvils.");
        assert_eq!(hit.provider, ProviderId::Perplexity);
    }
}
