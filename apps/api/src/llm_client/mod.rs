//! LLM client: the single point of entry for all generative-model calls.
//!
//! No other module talks to the model service directly. Everything goes through
//! the `GenerativeModel` trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::document::DocumentPayload;

#[cfg(test)]
pub mod mock;

const API_VERSION_PATH: &str = "v1beta/models";
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// The generative-model capability: prompt + résumé payload + job description → text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        document: &DocumentPayload,
        job_description: &str,
    ) -> Result<String, LlmError>;
}

/// Bounded attempts with exponential backoff. One attempt disables retrying.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn delay_before(&self, attempt: u32) -> Duration {
        // attempt is 1-based; 1s, 2s, 4s, ...
        self.base_delay * (1u32 << (attempt.saturating_sub(1)).min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay: DEFAULT_BACKOFF_BASE,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    #[serde(rename = "promptTokenCount", default)]
    pub prompt_tokens: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    pub output_tokens: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, `None` if it carries no text.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    retry: RetryPolicy,
}

impl GeminiClient {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.llm_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(
            Self::with_client(client, config.google_api_key.clone(), config.gemini_model.clone())
                .with_base_url(&config.gemini_base_url)
                .with_retry(RetryPolicy {
                    max_attempts: config.llm_max_attempts,
                    ..RetryPolicy::default()
                }),
        )
    }

    fn with_client(client: Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/{}:generateContent",
            self.base_url, API_VERSION_PATH, self.model
        )
    }

    /// Makes the raw call, returning the full response object.
    /// Retries transport errors, 429 and 5xx while attempts remain.
    pub async fn call(
        &self,
        prompt: &str,
        document: &DocumentPayload,
        job_description: &str,
    ) -> Result<GenerateContentResponse, LlmError> {
        let mut parts = vec![
            Part::Text { text: prompt },
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: document.mime_type,
                    data: &document.data,
                },
            },
        ];
        if !job_description.trim().is_empty() {
            parts.push(Part::Text {
                text: job_description,
            });
        }
        let request_body = GenerateContentRequest {
            contents: vec![Content { role: "user", parts }],
        };

        let url = self.endpoint();
        let mut last_error: Option<LlmError> = None;

        for attempt in 1..=self.retry.max_attempts {
            if attempt > 1 {
                let delay = self.retry.delay_before(attempt - 1);
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt - 1,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                let error = LlmError::Api {
                    status: status.as_u16(),
                    message,
                };
                if status.as_u16() == 429 || status.is_server_error() {
                    warn!("LLM API returned {}", status);
                    last_error = Some(error);
                    continue;
                }
                return Err(error);
            }

            let parsed: GenerateContentResponse = response.json().await?;

            if let Some(usage) = &parsed.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                    usage.prompt_tokens, usage.output_tokens
                );
            }

            return Ok(parsed);
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        document: &DocumentPayload,
        job_description: &str,
    ) -> Result<String, LlmError> {
        let response = self.call(prompt, document, job_description).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }
}
