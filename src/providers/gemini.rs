use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app_config::Config;
use crate::errors::{ConfigError, ProviderError};
use crate::language_utils;
use crate::providers::TranslationBackend;

/// Gemini client for interacting with the Google Gemini API
#[derive(Debug)]
pub struct GeminiClient {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL
    endpoint: String,
    /// Model name used in the request path
    model: String,
}

/// Gemini generateContent request
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    /// The conversation contents
    contents: Vec<GeminiContent>,

    /// Generation parameters
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// One content turn, a list of parts
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// The parts of this turn
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A single text part
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// The text content
    pub text: String,
}

/// Generation parameters
#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Gemini generateContent response
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    /// Candidate completions; the first one is used
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// A single response candidate
#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    /// The content of the candidate
    pub content: GeminiContent,
}

impl GeminiRequest {
    /// Create a new request from a single user prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt.into() }],
            }],
            generation_config: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generation_config = Some(GenerationConfig {
            temperature: Some(temperature),
        });
        self
    }
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Complete a generateContent request and return the response text
    pub async fn complete(&self, request: GeminiRequest) -> Result<String, ProviderError> {
        let api_url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Gemini API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthenticationError(error_text),
                429 => ProviderError::RateLimitExceeded(error_text),
                code => ProviderError::ApiError {
                    status_code: code,
                    message: error_text,
                },
            });
        }

        let gemini_response = response
            .json::<GeminiResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(Self::extract_text_from_response(&gemini_response))
    }

    /// Extract the concatenated text parts of the first candidate
    pub fn extract_text_from_response(response: &GeminiResponse) -> String {
        response
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Translation backend over the Gemini API
///
/// Wraps a batch of source texts into a single marker-delimited prompt and
/// splits the model response back into one block per input, keeping the
/// line breaks inside each block intact.
#[derive(Debug)]
pub struct GeminiBackend {
    /// HTTP client
    client: GeminiClient,
    /// Prompt preamble template with {source_language}/{target_language} placeholders
    prompt_template: String,
    /// Sampling temperature
    temperature: f32,
    /// Human-readable source language name for the prompt
    source_language: String,
    /// Human-readable target language name for the prompt
    target_language: String,
}

impl GeminiBackend {
    /// Create a new backend
    pub fn new(
        client: GeminiClient,
        prompt_template: impl Into<String>,
        temperature: f32,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            client,
            prompt_template: prompt_template.into(),
            temperature,
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Build a backend from the application configuration
    ///
    /// Resolves the API key (config value, environment, ~/.env) and maps the
    /// configured ISO language codes to the names used in the prompt.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.resolved_api_key()?;

        let client = GeminiClient::new(
            api_key,
            config.translation.endpoint.clone(),
            config.translation.model.clone(),
            config.translation.timeout_secs,
        );

        let source_language = language_utils::get_language_name(&config.source_language)
            .unwrap_or_else(|_| config.source_language.clone());
        let target_language = language_utils::get_language_name(&config.target_language)
            .unwrap_or_else(|_| config.target_language.clone());

        Ok(Self::new(
            client,
            config.translation.common.system_prompt.clone(),
            config.translation.common.temperature,
            source_language,
            target_language,
        ))
    }
}

#[async_trait]
impl TranslationBackend for GeminiBackend {
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = build_batch_prompt(
            &self.prompt_template,
            &self.source_language,
            &self.target_language,
            texts,
        );

        let request = GeminiRequest::new(prompt).temperature(self.temperature);
        let response = self.client.complete(request).await?;

        split_batch_response(&response, texts.len())
    }
}

/// Build the marker-delimited batch prompt.
///
/// Each source block is framed by `<<ENTRY_i>>` markers and the whole list
/// is terminated by `<<END>>`, so multi-line blocks survive the round trip
/// through the model without being flattened.
pub fn build_batch_prompt(
    template: &str,
    source_language: &str,
    target_language: &str,
    texts: &[String],
) -> String {
    let preamble = template
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language);

    let mut prompt = preamble;
    prompt.push_str("\n\n");

    for (idx, text) in texts.iter().enumerate() {
        prompt.push_str(&format!("<<ENTRY_{}>>\n", idx));
        prompt.push_str(text);
        prompt.push('\n');
    }
    prompt.push_str("<<END>>");

    prompt
}

/// Split a marker-delimited model response back into `count` text blocks.
///
/// Markers are searched in order; a missing marker means the model dropped
/// or merged an entry and the whole batch is rejected.
pub fn split_batch_response(response: &str, count: usize) -> Result<Vec<String>, ProviderError> {
    let mut texts = Vec::with_capacity(count);
    let mut cursor = 0;

    for idx in 0..count {
        let start_marker = format!("<<ENTRY_{}>>", idx);
        let end_marker = if idx + 1 == count {
            "<<END>>".to_string()
        } else {
            format!("<<ENTRY_{}>>", idx + 1)
        };

        let start_pos = response[cursor..]
            .find(&start_marker)
            .map(|pos| cursor + pos + start_marker.len())
            .ok_or_else(|| {
                ProviderError::ParseError(format!("response is missing marker {}", start_marker))
            })?;

        let end_pos = response[start_pos..]
            .find(&end_marker)
            .map(|pos| start_pos + pos)
            .ok_or_else(|| {
                ProviderError::ParseError(format!("response is missing marker {}", end_marker))
            })?;

        texts.push(response[start_pos..end_pos].trim().to_string());
        cursor = end_pos;
    }

    Ok(texts)
}
