//! Tenant prompt template types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tenant-scoped, versioned prompt template
///
/// Multiple versions may exist per key; only the highest-versioned active
/// one is used. The user template may contain `{placeholder}` tokens that
/// are interpolated from the request input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Tenant that owns this record
    pub tenant_id: String,
    /// Lookup key (task wire name or an explicit prompt key)
    pub key: String,
    /// Monotonically increasing version per key
    pub version: u32,
    /// System prompt text
    pub system_prompt: String,
    /// Optional user-message template with `{placeholder}` tokens
    pub user_template: Option<String>,
    /// Optional model override for the first chain entry
    pub model: Option<String>,
    /// Optional temperature override
    pub temperature: Option<f32>,
    /// Optional max-tokens override
    pub max_tokens: Option<u32>,
    /// Whether this version is eligible for use
    pub active: bool,
    /// Best-effort read counter, bumped on each resolution
    pub usage_count: u64,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}
