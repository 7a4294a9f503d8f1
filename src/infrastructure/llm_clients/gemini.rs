use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
struct GeminiPromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

pub struct GeminiClient {
    client: reqwest::Client,
}

impl GeminiClient {
    /// `timeout` of `None` waits for the service as long as it takes.
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = match builder.build() {
            Ok(client) => client,
            Err(err) => {
                warn!(
                    error = %err,
                    timeout = ?timeout,
                    "Failed to build HTTP client with configured timeout; using defaults"
                );
                reqwest::Client::new()
            }
        };
        Self { client }
    }

    fn normalize_model(model: &str) -> &str {
        let trimmed = model.trim();
        trimmed.strip_prefix("models/").unwrap_or(trimmed)
    }

    fn api_key(config: &LLMConfig) -> Result<&str> {
        config.credential().ok_or_else(|| {
            AppError::Configuration("Missing API key for Google provider".to_string())
        })
    }

    fn generation_config(config: &LLMConfig) -> Option<GenerationConfig> {
        if config.temperature.is_none() && config.max_tokens.is_none() {
            return None;
        }
        Some(GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
        })
    }

    fn extract_text(response: GeminiResponse) -> Result<String> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .map(|reason| format!(" (blocked: {})", reason))
                .unwrap_or_default();
            return Err(AppError::RemoteService(format!(
                "Response contained no candidates{}",
                reason
            )));
        };

        let texts: Vec<String> = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if texts.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(AppError::RemoteService(format!(
                "Invalid response format: candidate has no text (finish reason: {})",
                reason
            )));
        }

        Ok(texts.concat())
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate(&self, config: &LLMConfig, prompt: &str) -> Result<String> {
        let api_key = Self::api_key(config)?;
        let model_id = Self::normalize_model(&config.model);
        let base_url = config.base_url.trim_end_matches('/');
        let url = format!("{}/{}:generateContent", base_url, model_id);

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: Self::generation_config(config),
        };

        debug!(model = %model_id, base_url = %base_url, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::RemoteService(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteService(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::RemoteService(format!("Failed to parse JSON: {}", e)))?;

        Self::extract_text(json)
    }
}
