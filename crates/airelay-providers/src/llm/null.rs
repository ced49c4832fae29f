//! Scripted provider for testing
//!
//! Implements the `LlmProvider` port without any network. Outcomes can be
//! scripted per call; once the script runs out, the default content is
//! returned. Used by orchestrator and queue tests to exercise real routing
//! behavior deterministically.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use airelay_domain::error::{Error, ProviderErrorKind, Result};
use airelay_domain::ports::LlmProvider;
use airelay_domain::value_objects::{
    CompletionRequest, CompletionResponse, ProviderId, TokenUsage,
};

/// One scripted call outcome
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Succeed with this content
    Succeed(String),
    /// Fail with this classification
    Fail(ProviderErrorKind),
}

/// Scripted in-memory provider
pub struct NullLlmProvider {
    id: ProviderId,
    script: Mutex<VecDeque<ScriptedOutcome>>,
    default_content: String,
    calls: AtomicUsize,
    always_refail: AtomicBool,
}

impl NullLlmProvider {
    /// A provider that always succeeds with `content`
    pub fn succeeding<S: Into<String>>(id: ProviderId, content: S) -> Self {
        Self {
            id,
            script: Mutex::new(VecDeque::new()),
            default_content: content.into(),
            calls: AtomicUsize::new(0),
            always_refail: AtomicBool::new(false),
        }
    }

    /// A provider that always fails with `kind`
    pub fn failing(id: ProviderId, kind: ProviderErrorKind) -> Self {
        let provider = Self::succeeding(id, "");
        // An endless failure script is simulated by refilling in complete()
        provider.set_always_fail(kind);
        provider
    }

    fn set_always_fail(&self, kind: ProviderErrorKind) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(ScriptedOutcome::Fail(kind));
        }
        self.always_refail.store(true, Ordering::SeqCst);
    }

    /// Queue one scripted outcome for the next call
    pub fn push_outcome(&self, outcome: ScriptedOutcome) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
    }

    /// Number of `complete` calls observed
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for NullLlmProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let outcome = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());

        match outcome {
            Some(ScriptedOutcome::Fail(kind)) => {
                if self.always_refail.load(Ordering::SeqCst) {
                    self.push_outcome(ScriptedOutcome::Fail(kind));
                }
                Err(Error::provider(
                    self.id.as_str(),
                    "scripted failure",
                    kind,
                ))
            }
            Some(ScriptedOutcome::Succeed(content)) => Ok(self.response(content, request)),
            None => Ok(self.response(self.default_content.clone(), request)),
        }
    }
}

impl NullLlmProvider {
    fn response(&self, content: String, request: &CompletionRequest) -> CompletionResponse {
        CompletionResponse {
            content,
            usage: Some(TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
            }),
            model: request.model.clone(),
            latency: Duration::from_millis(1),
        }
    }
}
