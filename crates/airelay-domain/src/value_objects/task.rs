//! Logical task enumeration
//!
//! Every task carries a statically configured default `(provider, model)`
//! pair and a fallback order of providers, resolved by the routing table
//! in the infrastructure layer.

use serde::{Deserialize, Serialize};

/// A named logical AI operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Classify an inbound SMS message (intent, sentiment, confidence)
    SmsClassify,
    /// Generate a conversational reply for an ongoing thread
    ReplyGenerate,
    /// Deep web-backed research on a lead or company (idempotent, cacheable)
    LeadResearch,
    /// Score a lead for sales readiness (structured record output)
    LeadScore,
    /// Summarize a conversation thread
    ThreadSummarize,
}

impl TaskKind {
    /// Stable wire name, used for routing keys and usage attribution
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SmsClassify => "sms_classify",
            Self::ReplyGenerate => "reply_generate",
            Self::LeadResearch => "lead_research",
            Self::LeadScore => "lead_score",
            Self::ThreadSummarize => "thread_summarize",
        }
    }

    /// All known tasks, in routing-table order
    pub fn all() -> &'static [TaskKind] {
        &[
            Self::SmsClassify,
            Self::ReplyGenerate,
            Self::LeadResearch,
            Self::LeadScore,
            Self::ThreadSummarize,
        ]
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution priority of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Caller is waiting on the result
    #[default]
    Interactive,
    /// Queued execution, latency-tolerant
    Background,
}

impl Priority {
    /// Stable wire name, used for log attribution
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interactive => "interactive",
            Self::Background => "background",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
