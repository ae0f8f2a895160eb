//! OpenAI-compatible chat completions client.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::config::LlmConfig;
use crate::core::error::{RagError, Result};

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

const REPAIR_PROMPT: &str = "Your previous response was NOT valid JSON.
Return ONLY valid JSON, no markdown fences, no extra text.
Follow the required JSON schema strictly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Reply of a call that asked for JSON
#[derive(Debug, Clone, PartialEq)]
pub enum JsonReply {
    Parsed(serde_json::Value),
    /// Text that still was not JSON after the repair turn
    Raw(String),
}

impl JsonReply {
    pub fn parsed(&self) -> Option<&serde_json::Value> {
        match self {
            JsonReply::Parsed(value) => Some(value),
            JsonReply::Raw(_) => None,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for `POST {base_url}/chat/completions`
#[derive(Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl ChatClient {
    /// Build a client from the LLM section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when no API key is configured, or `Llm`
    /// when the HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| RagError::ConfigError("LLM_API_KEY is not set".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .build()?;

        Ok(Self::new(client, &config.base_url, api_key, &config.model))
    }

    pub fn new(client: reqwest::Client, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `messages` and return the first choice's content.
    ///
    /// # Errors
    ///
    /// Returns `Llm` on transport failure, a non-success status or a
    /// reply without content.
    pub async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!("LLM error {status}: {text}");
            return Err(RagError::Llm(format!("HTTP {}: {}", status.as_u16(), text)));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| RagError::Llm(format!("malformed response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| RagError::Llm("no content".to_string()))
    }

    /// Ask for JSON, with one repair turn at temperature 0.
    ///
    /// The first reply is parsed as JSON. If that fails, the reply is
    /// sent back as an assistant turn followed by a strict repair
    /// request. A second unparseable reply is returned as
    /// [`JsonReply::Raw`].
    ///
    /// # Errors
    ///
    /// Transport errors from either call are returned as-is.
    pub async fn chat_json(&self, messages: &[ChatMessage], temperature: f32) -> Result<JsonReply> {
        let first = self.chat(messages, temperature).await?;
        if let Ok(value) = serde_json::from_str(&first) {
            return Ok(JsonReply::Parsed(value));
        }

        tracing::debug!("LLM reply was not JSON, requesting repair");

        let mut retry = messages.to_vec();
        retry.push(ChatMessage::assistant(first));
        retry.push(ChatMessage::user(REPAIR_PROMPT));

        let second = self.chat(&retry, 0.0).await?;
        Ok(match serde_json::from_str(&second) {
            Ok(value) => JsonReply::Parsed(value),
            Err(_) => JsonReply::Raw(second),
        })
    }
}
