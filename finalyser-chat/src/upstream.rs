//! Client for the OpenAI-compatible chat-completion service

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::stream::ChatStream;

/// One role-tagged transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Scheme and host, without the `/v1/...` path
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Name reported when `api_key` is missing
    pub api_key_env: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            api_key_env: "FINALYSER_API_KEY".to_string(),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<&'a ChatMessage>,
    stream: bool,
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Send `system` followed by `transcript` with streaming enabled.
    ///
    /// Returns the raw response once its status is known to be a success;
    /// the body has not been read yet.
    pub async fn open(&self, system: &str, transcript: &[ChatMessage]) -> Result<reqwest::Response, ChatError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ChatError::NotConfigured(self.config.api_key_env.clone()))?;

        let system = ChatMessage::new("system", system);
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(&system);
        messages.extend(transcript.iter());

        let body = CompletionRequest {
            model: &self.config.model,
            messages,
            stream: true,
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_| ChatError::NotConfigured(self.config.api_key_env.clone()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(model = %self.config.model, turns = transcript.len(), "opening upstream chat stream");
        let resp = self
            .http
            .post(self.completions_url())
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        ensure_success(resp).await
    }

    /// Like [`open`](Self::open), decoded into text chunks
    pub async fn stream_chat(&self, system: &str, transcript: &[ChatMessage]) -> Result<ChatStream, ChatError> {
        Ok(ChatStream::from_response(self.open(system, transcript).await?))
    }
}

/// Pass a success response through; classify anything else
pub async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ChatError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let txt = resp.text().await.unwrap_or_default();
    match status.as_u16() {
        429 => tracing::warn!("upstream rate limited"),
        402 => tracing::warn!("upstream requires payment"),
        code => tracing::error!(status = code, body = %txt, "AI gateway error"),
    }
    Err(ChatError::from_status(status.as_u16(), txt))
}
