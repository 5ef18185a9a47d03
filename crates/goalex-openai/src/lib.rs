//! # goalex-openai
//!
//! [`TextGenerator`] backend for any endpoint that speaks the OpenAI
//! chat-completions protocol (OpenAI, Azure proxies, Ollama, vLLM, LM Studio).
//!
//! The client is blocking: one `generate` call is one HTTP round trip.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use goalex_core::{
    ChatMessage, EndpointConfig, GenerationError, GenerationResponse, Role, TextGenerationConfig,
    TextGenerator, Usage,
};

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    pub api_key: Option<String>,
    /// Model used when the generation config does not name one.
    pub default_model: String,
    pub timeout: Duration,
}

impl OpenAiSettings {
    /// Build settings from `[endpoint]`, reading the API key from the
    /// configured environment variable.
    pub fn from_endpoint(endpoint: &EndpointConfig) -> Self {
        let api_key = endpoint
            .api_key_env
            .as_deref()
            .filter(|var| !var.is_empty())
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty());
        Self {
            base_url: endpoint.base_url.clone(),
            api_key,
            default_model: endpoint.default_model.clone(),
            timeout: Duration::from_secs(endpoint.timeout_secs),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Blocking chat-completions client.
pub struct OpenAiGenerator {
    settings: OpenAiSettings,
    client: reqwest::blocking::Client,
}

impl OpenAiGenerator {
    pub fn new(settings: OpenAiSettings) -> Result<Self, GenerationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| GenerationError::NotConfigured(format!("HTTP client: {}", e)))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &OpenAiSettings {
        &self.settings
    }

    /// Build the JSON request body for one call.
    pub fn build_request_body(
        &self,
        messages: &[ChatMessage],
        config: &TextGenerationConfig,
    ) -> Value {
        let model = config
            .model
            .as_deref()
            .unwrap_or(&self.settings.default_model);

        let mut body = json!({
            "model": model,
            "messages": messages,
            "n": config.n,
            "temperature": config.temperature,
            "top_p": config.top_p,
            "frequency_penalty": config.frequency_penalty,
            "presence_penalty": config.presence_penalty,
        });
        if let Some(max_tokens) = config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if !config.stop.is_empty() {
            body["stop"] = json!(config.stop);
        }
        body
    }
}

impl TextGenerator for OpenAiGenerator {
    fn generate(
        &self,
        messages: &[ChatMessage],
        config: &TextGenerationConfig,
    ) -> Result<GenerationResponse, GenerationError> {
        let body = self.build_request_body(messages, config);
        let url = self.settings.completions_url();
        tracing::debug!(url = %url, model = %body["model"], "sending chat completion request");

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| GenerationError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            tracing::warn!(status, "chat completion request failed");
            return Err(classify_status(status, text));
        }

        let mut used = config.clone();
        if used.model.is_none() {
            used.model = Some(self.settings.default_model.clone());
        }
        parse_response(&text, used)
    }

    fn provider(&self) -> &str {
        "openai"
    }
}

/// Map a non-success HTTP status to an error.
pub fn classify_status(status: u16, body: String) -> GenerationError {
    match status {
        401 | 403 => GenerationError::Authentication { status, body },
        _ => GenerationError::Http { status, body },
    }
}

/// Decode a chat-completions response body.
///
/// Each choice becomes one assistant message, in choice order. A choice with
/// null content yields an empty string.
pub fn parse_response(
    body: &str,
    config: TextGenerationConfig,
) -> Result<GenerationResponse, GenerationError> {
    let decoded: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let text = decoded
        .choices
        .into_iter()
        .map(|choice| {
            let message = choice.message.unwrap_or_default();
            ChatMessage::new(
                message.role.unwrap_or(Role::Assistant),
                message.content.unwrap_or_default(),
            )
        })
        .collect();

    let usage = decoded.usage.map(|u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens.unwrap_or(u.prompt_tokens + u.completion_tokens),
    });

    Ok(GenerationResponse {
        text,
        config,
        usage,
    })
}

/// Chat-completions response format
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ResponseUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMessage {
    role: Option<Role>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: Option<u32>,
}
