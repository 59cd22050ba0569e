//! Conversation and generation-parameter types.

use serde::{Deserialize, Serialize};

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Sampling temperature sent when the caller does not override it.
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// The author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation.
    User,
    /// The language model.
    Model,
}

impl Role {
    /// Wire name of the role (`"user"` or `"model"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// Token accounting reported by the proxy for a completed reply.
///
/// The known Gemini counters are typed. Anything else the proxy sends is
/// kept in `extra` so it can be displayed or persisted without loss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageInfo {
    /// Tokens in the prompt (including history).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<u64>,
    /// Tokens in the generated candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates_token_count: Option<u64>,
    /// Tokens spent on thinking, for models that report it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thoughts_token_count: Option<u64>,
    /// Total tokens billed for the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_token_count: Option<u64>,
    /// Fields not covered above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One turn of a conversation.
///
/// A model turn filled by a streaming exchange starts with empty `text`
/// and grows until the exchange ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who produced the turn.
    pub role: Role,
    /// The turn's text.
    pub text: String,
    /// Usage reported for a model turn, when the proxy provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageInfo>,
}

impl ConversationTurn {
    /// A user turn carrying `text`.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            usage: None,
        }
    }

    /// A model turn carrying `text`.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            usage: None,
        }
    }

    /// An empty model turn, used as the anchor a stream fills in.
    #[must_use]
    pub fn seed() -> Self {
        Self::model(String::new())
    }

    /// Attach usage information.
    #[must_use]
    pub fn with_usage(mut self, usage: Option<UsageInfo>) -> Self {
        self.usage = usage;
        self
    }
}

/// Model selection and generation parameters for one request.
///
/// Values are forwarded to the proxy as-is. Empty strings passed to the
/// string setters clear the field, so an empty system prompt is never sent.
///
/// # Example
///
/// ```
/// use relay_types::GenerationConfig;
///
/// let config = GenerationConfig::default()
///     .system("Answer tersely.")
///     .top_k(40)
///     .thinking_budget(0);
/// assert_eq!(config.model, "gemini-2.5-flash");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Model identifier.
    pub model: String,
    /// System instruction.
    pub system: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold.
    pub top_p: Option<f64>,
    /// Top-k sampling cutoff.
    pub top_k: Option<u32>,
    /// Output token budget.
    pub max_output_tokens: Option<u32>,
    /// Requested MIME type of the reply (e.g. `application/json`).
    pub response_mime_type: Option<String>,
    /// Thinking budget in tokens; `0` disables thinking on models that
    /// support it. Gemini takes a whole token count, so fractional values
    /// are not representable.
    pub thinking_budget: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            system: None,
            temperature: Some(DEFAULT_TEMPERATURE),
            top_p: None,
            top_k: None,
            max_output_tokens: None,
            response_mime_type: None,
            thinking_budget: None,
        }
    }
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    (!value.is_empty()).then_some(value)
}

impl GenerationConfig {
    /// Override the model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the system instruction. An empty string clears it.
    #[must_use]
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = non_empty(system);
        self
    }

    /// Set or clear the temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: impl Into<Option<f64>>) -> Self {
        self.temperature = temperature.into();
        self
    }

    /// Set the nucleus sampling threshold.
    #[must_use]
    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the top-k cutoff.
    #[must_use]
    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Set the output token budget.
    #[must_use]
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Set the response MIME type. An empty string clears it.
    #[must_use]
    pub fn response_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.response_mime_type = non_empty(mime);
        self
    }

    /// Set the thinking budget.
    #[must_use]
    pub fn thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::User).unwrap(), "user");
        assert_eq!(serde_json::to_value(Role::Model).unwrap(), "model");
        assert_eq!(Role::Model.as_str(), "model");
    }

    #[test]
    fn seed_turn_is_empty_model_turn() {
        let turn = ConversationTurn::seed();
        assert_eq!(turn.role, Role::Model);
        assert!(turn.text.is_empty());
        assert!(turn.usage.is_none());
    }

    #[test]
    fn turn_without_usage_omits_field() {
        let json = serde_json::to_value(ConversationTurn::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "text": "hi"}));
    }

    #[test]
    fn usage_keeps_unknown_fields() {
        let usage: UsageInfo = serde_json::from_value(serde_json::json!({
            "promptTokenCount": 4,
            "totalTokenCount": 9,
            "cachedContentTokenCount": 2
        }))
        .unwrap();
        assert_eq!(usage.prompt_token_count, Some(4));
        assert_eq!(usage.total_token_count, Some(9));
        assert_eq!(usage.candidates_token_count, None);
        assert_eq!(usage.extra["cachedContentTokenCount"], 2);
    }

    #[test]
    fn default_config_matches_playground_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, Some(1.0));
        assert!(config.system.is_none());
        assert!(config.thinking_budget.is_none());
    }

    #[test]
    fn empty_strings_clear_optional_text_fields() {
        let config = GenerationConfig::default()
            .system("be brief")
            .response_mime_type("application/json")
            .system("")
            .response_mime_type("");
        assert!(config.system.is_none());
        assert!(config.response_mime_type.is_none());
    }

    #[test]
    fn temperature_can_be_cleared() {
        let config = GenerationConfig::default().temperature(None);
        assert!(config.temperature.is_none());
        let config = config.temperature(0.2);
        assert_eq!(config.temperature, Some(0.2));
    }
}
