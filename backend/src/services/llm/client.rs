//! OpenAI-compatible chat-completion client

use async_trait::async_trait;
use reqwest::{Client, header};
use std::time::Duration;

use super::models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, LLMError};
use crate::config::LlmConfig;

/// Anything that can turn a prompt into generated text.
///
/// The blessing service only depends on this trait, so tests can swap in a
/// scripted implementation instead of a live endpoint.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError>;
}

pub struct LLMClient {
    http_client: Client,
    config: LlmConfig,
}

impl LLMClient {
    pub fn new(config: LlmConfig) -> Result<Self, LLMError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LLMError::ApiError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client, config })
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model_name.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for LLMClient {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        if self.config.api_url.trim().is_empty() {
            return Err(LLMError::NotConfigured("API_URL"));
        }

        let body = self.build_request(prompt);
        tracing::debug!(
            "Calling completion endpoint {} (model: {}, prompt: {} chars)",
            self.config.api_url,
            body.model,
            prompt.chars().count()
        );

        let started = std::time::Instant::now();
        let response = self
            .http_client
            .post(&self.config.api_url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LLMError::Timeout(self.config.timeout_secs)
                } else {
                    LLMError::ApiError(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Completion endpoint returned {}: {}", status, error_text);
            return Err(LLMError::Status { status: status.as_u16(), body: error_text });
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LLMError::Timeout(self.config.timeout_secs)
            } else {
                LLMError::ParseError(e.to_string())
            }
        })?;

        tracing::debug!(
            "Completion finished in {}ms with {} choice(s)",
            started.elapsed().as_millis(),
            parsed.choices.len()
        );

        parsed.first_content().map(str::to_string).ok_or(LLMError::EmptyResponse)
    }
}
