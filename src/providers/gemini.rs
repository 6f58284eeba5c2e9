//! Cloud completion provider (Gemini `generateContent`)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::cli::config::CloudConfig;
use crate::errors::{RfpError, Result};
use crate::providers::{CompletionProvider, TEMPERATURE};
use crate::types::{GenerationResult, Mode, Provider};

/// Output token cap for cloud generations
pub const MAX_OUTPUT_TOKENS: u32 = 900;

/// Gemini REST client
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    config: CloudConfig,
    api_key: String,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("endpoint", &self.config.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiProvider {
    /// Create provider with an explicit API key
    pub fn new(config: CloudConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(RfpError::HttpError)?;

        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    /// Create provider reading the key from `config.api_key_env`
    pub fn from_env(config: CloudConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RfpError::MissingCredentials(config.api_key_env.clone()))?;

        Self::new(config, api_key)
    }

    fn url_for(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            model
        )
    }

    /// Send one request and return the concatenated candidate text
    async fn request(&self, prompt: &str, model: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self.client
            .post(self.url_for(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RfpError::ProviderError(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RfpError::ProviderError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RfpError::ProviderError(format!("Failed to parse response: {}", e)))?;

        Ok(body.text())
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn kind(&self) -> Provider {
        Provider::Cloud
    }

    fn model_for(&self, mode: Mode) -> &str {
        self.config.model_for(mode)
    }

    async fn complete(&self, prompt: &str, mode: Mode) -> GenerationResult {
        let model = self.model_for(mode);
        debug!("Gemini request: model={} prompt_chars={}", model, prompt.chars().count());

        match self.request(prompt, model).await {
            Ok(text) => {
                let result = GenerationResult::from_completion(&text);
                if !result.is_answer() {
                    warn!("Gemini returned an empty response (model {})", model);
                }
                result
            }
            Err(e) => {
                warn!("Gemini error: {}", e);
                GenerationResult::failed(e.to_string())
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateContentResponse {
    /// Text of the first candidate; blocked or empty responses yield ""
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content.parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
