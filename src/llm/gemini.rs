//! Gemini API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Credential;
use crate::error::GenerationError;
use crate::llm::TextGenerator;
use crate::llm::retry::retry_with_backoff;

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const TEMPERATURE: f32 = 0.4;
const MAX_OUTPUT_TOKENS: u32 = 1024;

/// [`TextGenerator`] backed by the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    credential: Credential,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(credential: Credential, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            credential,
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API root (used against mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single request, no retry.
    async fn generate_once(&self, api_key: &str, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let request_body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(GenerationError::RequestFailed)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(GenerationError::RequestFailed)?;
        parse_gemini_response(&body)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let Credential::Present(api_key) = &self.credential else {
            return Err(GenerationError::MissingCredential);
        };

        debug!("Sending {} char prompt to {}", prompt.len(), self.model);
        retry_with_backoff(
            || self.generate_once(api_key, prompt),
            is_retryable,
            |e| GenerationError::RetriesExhausted(Box::new(e)),
        )
        .await
    }
}

/// Transport failures, rate limits and server errors are worth retrying.
fn is_retryable(error: &GenerationError) -> bool {
    match error {
        GenerationError::RequestFailed(_) => true,
        GenerationError::ApiError { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

/// Unwrap `candidates[0].content.parts[*].text` from a response envelope.
fn parse_gemini_response(body: &str) -> Result<String, GenerationError> {
    let response: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    let cleaned = text.trim();
    if cleaned.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(cleaned.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}
