//! Generative fallback client for transcripts the rule parser cannot read.
//!
//! Calls a local Ollama-compatible HTTP endpoint (`/api/chat`) with a
//! schema-constrained prompt and returns the raw completion text. The
//! caller reconciles that text against the rule parse; any failure here
//! degrades to the rule result, so this client never takes the pipeline
//! down with it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vc_protocol::{CoreError, CoreResult};

/// Schema contract appended to every prompt. The reconciler depends on
/// these field names, so keep the two in sync.
pub const SCHEMA_HINT: &str = r#"Return ONLY valid JSON with this exact schema:
{
  "action": "add|remove|update|search|unknown",
  "item": "string",
  "brand": "string",
  "quantity": number|null,
  "quantityProvided": boolean,
  "unit": "string",
  "size": "string",
  "filters": {
    "query": "string",
    "brand": "string",
    "size": "string",
    "maxPrice": number|null,
    "minPrice": number|null
  },
  "confidence": "high|medium|low"
}
Rules:
- action must reflect user intent in any language (English, Spanish, Hindi, Hinglish).
- item must be a clean product name in English when possible.
- quantity must be null only when user did not specify quantity in a search query.
- unit should be one of: kg, g, liter, ml, unit, piece, pack, bottle.
- Never include markdown or code fences."#;

/// Render the user prompt for one transcript.
pub fn build_prompt(transcript: &str, locale: &str) -> String {
    format!("User language locale: {locale}\nTranscript: \"{transcript}\"\n{SCHEMA_HINT}")
}

/// Anything that can turn a prompt into completion text. Implemented by
/// [`GenerativeClient`] for real deployments and by in-process fakes in
/// tests.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> CoreResult<String>;
}

/// Configuration for the generative fallback endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerativeConfig {
    /// Chat API base URL.
    #[serde(default = "default_host")]
    pub host: String,
    /// Model to use for parsing.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whether the generative fallback is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_host() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "llama3.2:3b".into()
}
fn default_timeout_secs() -> u64 {
    5
}
fn default_enabled() -> bool {
    true
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            enabled: default_enabled(),
        }
    }
}

impl GenerativeConfig {
    /// Build from `VOCART_*` environment variables, with defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let disabled = std::env::var("VOCART_DISABLE_GENERATIVE")
            .map(|value| is_truthy(&value))
            .unwrap_or(false);
        Self {
            host: std::env::var("VOCART_GENERATIVE_HOST").unwrap_or(defaults.host),
            model: std::env::var("VOCART_GENERATIVE_MODEL").unwrap_or(defaults.model),
            timeout_secs: std::env::var("VOCART_GENERATIVE_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            enabled: !disabled,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Chat API request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

/// A single message in the chat request.
#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat API response (only fields we need).
#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// HTTP client for the generative fallback endpoint.
pub struct GenerativeClient {
    client: reqwest::Client,
    config: GenerativeConfig,
}

impl GenerativeClient {
    pub fn new(config: GenerativeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build reqwest client");
        Self { client, config }
    }
}

#[async_trait]
impl CompletionBackend for GenerativeClient {
    async fn complete(&self, prompt: &str) -> CoreResult<String> {
        let url = format!("{}/api/chat", self.config.host);
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::ExternalUnavailable(format!("chat request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::ExternalUnavailable(format!(
                "chat endpoint returned {status}"
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| CoreError::ExternalUnavailable(format!("invalid chat response: {e}")))?;

        match chat.message {
            Some(message) if !message.content.trim().is_empty() => Ok(message.content),
            _ => Err(CoreError::ExternalUnavailable("empty completion".into())),
        }
    }
}
