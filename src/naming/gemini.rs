//! Text-generation client abstraction.
//!
//! This module defines the `TextGenerator` trait so the naming service can be
//! exercised without network access, and a Gemini implementation built on
//! `reqwest`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::NamingConfig;
use crate::error::NamingError;

/// Trait for one-shot text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send `prompt` to `model` and return the response text.
    ///
    /// # Errors
    /// Returns an error if the credential is missing, the request fails, or
    /// the response carries no text.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, NamingError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    timeout: Option<Duration>,
}

impl GeminiClient {
    /// Create a client from naming configuration.
    pub fn new(config: &NamingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        }
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.endpoint)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[tracing::instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, NamingError> {
        let api_key = self.api_key.as_deref().ok_or(NamingError::MissingCredential)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let mut request = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", api_key)
            .json(&body);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(NamingError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        tracing::debug!(status = status.as_u16(), response_len = text.len(), "Text generation completed");

        let parsed: GenerateContentResponse = serde_json::from_str(&text)?;
        parsed.text().ok_or(NamingError::EmptyResponse)
    }
}
