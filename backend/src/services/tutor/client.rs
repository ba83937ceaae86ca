//! Chat Completions client
//!
//! `CompletionClient` is the seam between the tutor service and the hosted
//! model; `OpenAIClient` talks to any OpenAI-compatible `/chat/completions`
//! endpoint over reqwest.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::ChatMessage;

/// Model used for every tutor request.
pub const MODEL: &str = "gpt-4o-mini";
/// Sampling temperature used for every tutor request.
pub const TEMPERATURE: f32 = 0.5;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Error code: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Invalid completion response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Completion response contained no choices")]
    NoChoices,

    #[error("Request timed out after {0}s")]
    Timeout(u64),
}

/// A single non-streaming chat completion.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the raw content of the first choice.
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, CompletionError>;
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ============================================================================
// OpenAI client
// ============================================================================

pub struct OpenAIClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAIClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self { http_client, base_url: base_url.into(), api_key: api_key.into() })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, CompletionError> {
        let url = self.completions_url();
        tracing::debug!("POST {} ({} messages, model {})", url, messages.len(), model);

        let body = ChatCompletionRequest { model, messages, temperature };
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!("Completion API returned {}: {}", status, text);
            return Err(CompletionError::Api { status: status.as_u16(), body: text });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        let choice = parsed.choices.into_iter().next().ok_or(CompletionError::NoChoices)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}
