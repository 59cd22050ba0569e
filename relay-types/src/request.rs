//! JSON bodies exchanged with the model proxy.
//!
//! Request:
//! ```json
//! {"prompt":"Hi","model":"gemini-2.5-flash","temperature":1.0,"stream":true}
//! ```
//! Non-streaming calls additionally carry
//! `"history":[{"role":"user","parts":[{"text":"..."}]}]`.

use serde::{Deserialize, Serialize};

use crate::types::{ConversationTurn, GenerationConfig, Role, UsageInfo};

/// Body of a POST to the proxy endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    /// The user's prompt for this exchange.
    pub prompt: String,
    /// Model identifier.
    pub model: String,
    /// System instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Sampling temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Top-k cutoff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Output token budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Requested MIME type of the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Thinking budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<u32>,
    /// Whether the proxy should answer with an event stream.
    pub stream: bool,
    /// Prior turns; only sent on non-streaming calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryEntry>>,
}

/// One prior turn in the proxy's history format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Author of the turn.
    pub role: Role,
    /// Content parts; relay always sends a single text part.
    pub parts: Vec<HistoryPart>,
}

/// A text part of a [`HistoryEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPart {
    /// The part's text.
    pub text: String,
}

impl From<&ConversationTurn> for HistoryEntry {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.role,
            parts: vec![HistoryPart {
                text: turn.text.clone(),
            }],
        }
    }
}

impl ProxyRequest {
    fn build(prompt: impl Into<String>, config: &GenerationConfig, stream: bool) -> Self {
        Self {
            prompt: prompt.into(),
            model: config.model.clone(),
            system: config.system.clone().filter(|s| !s.is_empty()),
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
            response_mime_type: config.response_mime_type.clone().filter(|s| !s.is_empty()),
            thinking_budget: config.thinking_budget,
            stream,
            history: None,
        }
    }

    /// A streaming request. History is never attached to streaming calls.
    #[must_use]
    pub fn streaming(prompt: impl Into<String>, config: &GenerationConfig) -> Self {
        Self::build(prompt, config, true)
    }

    /// A non-streaming request carrying `history` (the turns that precede
    /// this prompt).
    #[must_use]
    pub fn complete(
        prompt: impl Into<String>,
        config: &GenerationConfig,
        history: &[ConversationTurn],
    ) -> Self {
        let mut request = Self::build(prompt, config, false);
        request.history = Some(history.iter().map(HistoryEntry::from).collect());
        request
    }
}

/// Body of a successful non-streaming reply.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    /// The model's reply; missing or `null` reads as empty.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    usage: Option<UsageInfo>,
    #[serde(default)]
    usage_metadata: Option<UsageInfo>,
}

impl ProxyResponse {
    /// Build a response directly (used by transports and tests).
    #[must_use]
    pub fn new(text: impl Into<String>, usage: Option<UsageInfo>) -> Self {
        Self {
            text: Some(text.into()),
            usage,
            usage_metadata: None,
        }
    }

    /// The reply text, `""` when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Usage under `usage`, falling back to Gemini's raw `usageMetadata`.
    #[must_use]
    pub fn usage(&self) -> Option<&UsageInfo> {
        self.usage.as_ref().or(self.usage_metadata.as_ref())
    }

    /// Convert into the model turn that records this reply.
    #[must_use]
    pub fn into_turn(self) -> ConversationTurn {
        let usage = self.usage.or(self.usage_metadata);
        ConversationTurn::model(self.text.unwrap_or_default()).with_usage(usage)
    }
}
