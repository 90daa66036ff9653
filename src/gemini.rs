// src/gemini.rs

//! Client for the Gemini `generateContent` REST API.
//!
//! Only single-turn text generation is used. Calls log the model name,
//! latency and response size; never the API key or the response contents.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use url::Url;

use crate::config::GeminiConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Anything that turns a prompt into raw model text.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Connectivity, timeout or an undecodable body.
    Request(String),
    /// The API answered with a non-success status.
    Api { status: u16, message: String },
    /// The prompt was refused.
    Blocked(String),
    /// The API answered but produced no text.
    Empty,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Request(msg) => f.write_str(msg),
            GenerationError::Api { status, message } => {
                write!(f, "Gemini API error ({}): {}", status, message)
            }
            GenerationError::Blocked(reason) => write!(f, "Gemini blocked the prompt: {}", reason),
            GenerationError::Empty => f.write_str("Received empty response from Gemini"),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Request(err.to_string())
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: Url,
    model: String,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl GeminiClient {
    /// Builds the client, or `None` when no API key is configured.
    pub fn from_config(config: &GeminiConfig) -> Result<Option<Self>, reqwest::Error> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            client,
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> Result<Url, GenerationError> {
        self.base_url
            .join(&format!("models/{}:generateContent", self.model))
            .map_err(|e| GenerationError::Request(format!("invalid Gemini endpoint: {}", e)))
    }

    fn request_body<'a>(&self, prompt: &'a str) -> GenerateContentRequest<'a> {
        let generation_config = if self.temperature.is_some() || self.max_output_tokens.is_some() {
            Some(GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config,
        }
    }

    #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError> {
        let started = Instant::now();

        let res = self
            .client
            .post(self.endpoint()?)
            .header(USER_AGENT, concat!("quizgen/", env!("CARGO_PKG_VERSION")))
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            let message = extract_api_error(&body).unwrap_or(body);
            return Err(GenerationError::Api { status, message });
        }

        let body: GenerateContentResponse = res.json().await?;
        if let Some(usage) = &body.usage_metadata {
            info!(
                prompt_tokens = ?usage.prompt_token_count,
                candidates_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                "Gemini usage"
            );
        }

        let text = body.into_text()?;
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_len = text.len(),
            "Gemini response received"
        );
        Ok(text)
    }
}

#[async_trait]
impl QuizGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.generate_content(prompt).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
    total_token_count: Option<u64>,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate.
    fn into_text(self) -> Result<String, GenerationError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GenerationError::Blocked(reason));
        }

        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(text)
    }
}

/// Pulls `error.message` out of a Google API error envelope.
fn extract_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct EWrap {
        error: EObj,
    }
    #[derive(Deserialize)]
    struct EObj {
        message: String,
    }
    serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(temperature: Option<f32>) -> GeminiClient {
        let config = GeminiConfig {
            api_key: Some("key".to_string()),
            temperature,
            ..GeminiConfig::default()
        };
        GeminiClient::from_config(&config).unwrap().unwrap()
    }

    #[test]
    fn no_key_means_no_client() {
        assert!(GeminiClient::from_config(&GeminiConfig::default()).unwrap().is_none());
    }

    #[test]
    fn endpoint_appends_model_path() {
        let url = client(None).endpoint().unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro-exp-03-25:generateContent"
        );
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(client(None).request_body("hello")).unwrap();
        assert_eq!(
            body,
            json!({ "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }] })
        );

        let body = serde_json::to_value(client(Some(0.5)).request_body("hello")).unwrap();
        assert_eq!(body["generationConfig"], json!({ "temperature": 0.5 }));
    }

    #[test]
    fn joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "[{\"a\":" }, { "text": " 1}]" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "[{\"a\": 1}]");
    }

    #[test]
    fn missing_candidates_is_empty() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.into_text(), Err(GenerationError::Empty));

        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert_eq!(response.into_text(), Err(GenerationError::Empty));
    }

    #[test]
    fn blocked_prompt_is_reported() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        assert_eq!(
            response.into_text(),
            Err(GenerationError::Blocked("SAFETY".to_string()))
        );
    }

    #[test]
    fn extracts_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(extract_api_error(body).as_deref(), Some("API key not valid."));
        assert_eq!(extract_api_error("<html>"), None);
    }
}
