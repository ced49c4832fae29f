//! Request context carried through a call

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable value carried through one orchestrator call
///
/// Used for usage attribution and log correlation only; the routing
/// decision never depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Tenant the call is billed against
    pub tenant_id: String,
    /// Optional acting user
    pub user_id: Option<String>,
    /// Optional lead correlation id
    pub lead_id: Option<String>,
    /// Optional conversation correlation id
    pub conversation_id: Option<String>,
    /// Trace id propagated into logs and results
    pub trace_id: String,
    /// Channel tag (e.g. "sms", "web") for usage attribution
    pub channel: String,
}

impl RequestContext {
    /// Create a context for a tenant with a fresh trace id
    pub fn new<T: Into<String>, C: Into<String>>(tenant_id: T, channel: C) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: None,
            lead_id: None,
            conversation_id: None,
            trace_id: Uuid::new_v4().to_string(),
            channel: channel.into(),
        }
    }

    /// Attach an acting user
    pub fn with_user<S: Into<String>>(mut self, user_id: S) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Attach a lead correlation id
    pub fn with_lead<S: Into<String>>(mut self, lead_id: S) -> Self {
        self.lead_id = Some(lead_id.into());
        self
    }

    /// Attach a conversation correlation id
    pub fn with_conversation<S: Into<String>>(mut self, conversation_id: S) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }
}
