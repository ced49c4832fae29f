//! Prompt resolution with tenant overrides
//!
//! Looks up the tenant's highest-versioned active prompt record (by
//! explicit key, else by task name) and falls back to the built-in
//! defaults. Builds the two-message payload by interpolating the request
//! input into the `{placeholder}` template, or serializing the input when
//! no template exists. Reads bump a best-effort usage counter.

use airelay_domain::constants::DEFAULT_TEMPERATURE;
use airelay_domain::repositories::PromptStore;
use airelay_domain::value_objects::{ChatMessage, TaskKind};
use std::sync::Arc;
use tracing::warn;

/// Fallback system prompt when neither a record nor a task default exists
const GENERIC_SYSTEM_PROMPT: &str = "You are a helpful assistant for a sales CRM.";

/// A prompt ready to send: messages plus per-call model overrides
#[derive(Debug, Clone)]
pub struct ResolvedPrompt {
    /// System + user message payload
    pub messages: Vec<ChatMessage>,
    /// Model override from the prompt record, if any
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Max-tokens override from the prompt record, if any
    pub max_tokens: Option<u32>,
}

/// Built-in default prompt for one task
struct DefaultPrompt {
    system: &'static str,
    user_template: Option<&'static str>,
    temperature: f32,
}

fn default_for(task: TaskKind) -> DefaultPrompt {
    match task {
        TaskKind::SmsClassify => DefaultPrompt {
            system: "You classify inbound SMS messages for a sales CRM. Respond with a \
                     single JSON object with keys \"intent\", \"sentiment\", \
                     \"confidence\" (0-1) and \"suggested_action\".",
            user_template: Some("Classify this message:\n{message}"),
            temperature: DEFAULT_TEMPERATURE,
        },
        TaskKind::ReplyGenerate => DefaultPrompt {
            system: "You draft concise, friendly SMS replies for an ongoing sales \
                     conversation. Keep replies under 160 characters.",
            user_template: Some("Conversation so far:\n{history}\n\nDraft a reply to:\n{message}"),
            temperature: 0.7,
        },
        TaskKind::LeadResearch => DefaultPrompt {
            system: "You are a meticulous B2B research assistant. Cite concrete facts \
                     and recent developments.",
            user_template: Some(
                "Research the following company or lead and summarize key facts, \
                 recent news and buying signals:\n{subject}",
            ),
            temperature: DEFAULT_TEMPERATURE,
        },
        TaskKind::LeadScore => DefaultPrompt {
            system: "You score sales leads. Respond with a single JSON object with \
                     keys \"score\" (0-100), \"reasons\" (array of strings) and \
                     \"confidence\" (0-1).",
            user_template: Some("Score this lead:\n{lead}"),
            temperature: DEFAULT_TEMPERATURE,
        },
        TaskKind::ThreadSummarize => DefaultPrompt {
            system: "You summarize sales conversations into a short paragraph of the \
                     key points and next steps.",
            user_template: Some("Summarize this conversation:\n{history}"),
            temperature: DEFAULT_TEMPERATURE,
        },
    }
}

/// Interpolate `{placeholder}` tokens from a JSON object
///
/// Unknown placeholders are left in place so a template typo is visible
/// in the output rather than silently dropped.
fn render_template(template: &str, input: &serde_json::Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match input.get(name) {
                    Some(serde_json::Value::String(s)) => out.push_str(s),
                    Some(value) => out.push_str(&value.to_string()),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn input_as_text(input: &serde_json::Value) -> String {
    match input {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolver over the tenant prompt store and the built-in defaults
pub struct PromptResolver {
    store: Arc<dyn PromptStore>,
}

impl PromptResolver {
    /// Create a resolver over a prompt store
    pub fn new(store: Arc<dyn PromptStore>) -> Self {
        Self { store }
    }

    /// Resolve the prompt for a task and build the two-message payload
    pub async fn resolve(
        &self,
        tenant_id: &str,
        task: TaskKind,
        prompt_key: Option<&str>,
        input: &serde_json::Value,
    ) -> ResolvedPrompt {
        let record = self.lookup(tenant_id, task, prompt_key).await;
        let defaults = default_for(task);

        match record {
            Some(record) => {
                self.bump_usage_async(&record);
                let user = match &record.user_template {
                    Some(template) => render_template(template, input),
                    None => input_as_text(input),
                };
                ResolvedPrompt {
                    messages: vec![
                        ChatMessage::system(&record.system_prompt),
                        ChatMessage::user(user),
                    ],
                    model: record.model.clone(),
                    temperature: record.temperature.unwrap_or(defaults.temperature),
                    max_tokens: record.max_tokens,
                }
            }
            None => {
                let system = if defaults.system.is_empty() {
                    GENERIC_SYSTEM_PROMPT
                } else {
                    defaults.system
                };
                let user = match defaults.user_template {
                    Some(template) => render_template(template, input),
                    None => input_as_text(input),
                };
                ResolvedPrompt {
                    messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
                    model: None,
                    temperature: defaults.temperature,
                    max_tokens: None,
                }
            }
        }
    }

    /// Lookup by explicit key first, then by task name
    async fn lookup(
        &self,
        tenant_id: &str,
        task: TaskKind,
        prompt_key: Option<&str>,
    ) -> Option<airelay_domain::value_objects::PromptRecord> {
        if let Some(key) = prompt_key {
            match self.store.find_active(tenant_id, key).await {
                Ok(Some(record)) => return Some(record),
                Ok(None) => {}
                Err(err) => {
                    warn!(tenant_id, key, error = %err, "prompt lookup failed, using defaults");
                    return None;
                }
            }
        }
        match self.store.find_active(tenant_id, task.as_str()).await {
            Ok(record) => record,
            Err(err) => {
                warn!(tenant_id, task = %task, error = %err, "prompt lookup failed, using defaults");
                None
            }
        }
    }

    /// Bump the usage counter without blocking the caller
    fn bump_usage_async(&self, record: &airelay_domain::value_objects::PromptRecord) {
        let store = Arc::clone(&self.store);
        let (tenant, key, version) = (
            record.tenant_id.clone(),
            record.key.clone(),
            record.version,
        );
        tokio::spawn(async move {
            if let Err(err) = store.bump_usage(&tenant, &key, version).await {
                warn!(tenant, key, error = %err, "failed to bump prompt usage counter");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airelay_domain::value_objects::{PromptRecord, Role};
    use airelay_providers::stores::InMemoryPromptStore;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn template_interpolates_string_and_non_string_values() {
        let input = json!({"message": "hi there", "count": 3});
        let rendered = render_template("msg={message} count={count} missing={nope}", &input);
        assert_eq!(rendered, "msg=hi there count=3 missing={nope}");
    }

    #[tokio::test]
    async fn falls_back_to_built_in_defaults() {
        let resolver = PromptResolver::new(Arc::new(InMemoryPromptStore::new()));
        let prompt = resolver
            .resolve("t1", TaskKind::SmsClassify, None, &json!({"message": "stop"}))
            .await;
        assert_eq!(prompt.messages.len(), 2);
        assert_eq!(prompt.messages[0].role, Role::System);
        assert!(prompt.messages[1].content.contains("stop"));
        assert!(prompt.model.is_none());
    }

    #[tokio::test]
    async fn tenant_record_overrides_defaults_and_bumps_usage() {
        let store = Arc::new(InMemoryPromptStore::new());
        store
            .upsert(PromptRecord {
                tenant_id: "t1".into(),
                key: "sms_classify".into(),
                version: 2,
                system_prompt: "custom system".into(),
                user_template: Some("INPUT: {message}".into()),
                model: Some("gpt-4o".into()),
                temperature: Some(0.9),
                max_tokens: Some(128),
                active: true,
                usage_count: 0,
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        let resolver = PromptResolver::new(store.clone());
        let prompt = resolver
            .resolve("t1", TaskKind::SmsClassify, None, &json!({"message": "yo"}))
            .await;
        assert_eq!(prompt.messages[0].content, "custom system");
        assert_eq!(prompt.messages[1].content, "INPUT: yo");
        assert_eq!(prompt.model.as_deref(), Some("gpt-4o"));
        assert_eq!(prompt.max_tokens, Some(128));

        // Usage bump is spawned; give it a moment to run
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(store.usage_count("t1", "sms_classify", 2).await, Some(1));
    }
}
