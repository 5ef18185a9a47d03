// textgen.rs — The text-generation capability consumed by the explorer.
//
// A backend receives an ordered list of role-tagged messages plus a
// generation config and returns one content item per completion. The
// explorer never interprets the config; it forwards it unchanged.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Generation parameters passed through to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextGenerationConfig {
    /// Number of completions to request.
    pub n: u32,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    /// Model name; backends fall back to their own default when unset.
    pub model: Option<String>,
    /// Provider hint, informational only.
    pub provider: Option<String>,
    pub stop: Vec<String>,
}

impl Default for TextGenerationConfig {
    fn default() -> Self {
        Self {
            n: 1,
            temperature: 0.0,
            max_tokens: None,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            model: None,
            provider: None,
            stop: Vec::new(),
        }
    }
}

/// Token accounting reported by a backend, when available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// What a backend returns for one `generate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// One content item per completion, in backend order.
    pub text: Vec<ChatMessage>,

    /// The config the backend actually used.
    pub config: TextGenerationConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl GenerationResponse {
    /// Text of the first content item, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.text.first().map(|m| m.content.as_str())
    }
}

/// A text-generation backend.
///
/// Implementations must be usable from any thread; each call is
/// independent and blocking.
pub trait TextGenerator: Send + Sync {
    /// Generate completions for the given messages.
    fn generate(
        &self,
        messages: &[ChatMessage],
        config: &TextGenerationConfig,
    ) -> Result<GenerationResponse, GenerationError>;

    /// Backend name for logs and CLI output.
    fn provider(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&ChatMessage::system("hi")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"hi"}"#);
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: TextGenerationConfig =
            serde_json::from_str(r#"{"model":"gpt-4o-mini","temperature":0.3}"#).unwrap();
        assert_eq!(config.n, 1);
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
        assert!(config.max_tokens.is_none());
    }

    #[test]
    fn first_text_reads_first_item_only() {
        let response = GenerationResponse {
            text: vec![ChatMessage::assistant("one"), ChatMessage::assistant("two")],
            config: TextGenerationConfig::default(),
            usage: None,
        };
        assert_eq!(response.first_text(), Some("one"));
    }

    #[test]
    fn first_text_is_none_for_empty_response() {
        let response = GenerationResponse {
            text: Vec::new(),
            config: TextGenerationConfig::default(),
            usage: None,
        };
        assert!(response.first_text().is_none());
    }
}
