//! Local completion provider (Ollama)
//!
//! Non-streaming `POST /api/generate` with a bounded request timeout.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::cli::config::OllamaConfig;
use crate::errors::{RfpError, Result};
use crate::providers::{CompletionProvider, TEMPERATURE};
use crate::types::{GenerationResult, Mode, Provider};

/// Output token cap for local generations
pub const NUM_PREDICT: u32 = 180;

/// Local model server client
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create provider with the configured endpoint, models and timeout
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(RfpError::HttpError)?;

        Ok(Self { client, config })
    }

    /// Send one generation request and return the raw `response` text
    async fn request(&self, prompt: &str, model: &str) -> Result<String> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: NUM_PREDICT,
                temperature: TEMPERATURE,
            },
        };

        let response = self.client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| RfpError::ProviderError(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(RfpError::ProviderError(format!(
                "Ollama returned status {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| RfpError::ProviderError(format!("Failed to parse response: {}", e)))?;

        Ok(body.response)
    }

    /// Check if the model server is reachable
    pub async fn health_check(&self) -> bool {
        match self.client.get(self.tags_url()).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// `/api/tags` on the same server as the generate endpoint
    fn tags_url(&self) -> String {
        let endpoint = self.config.endpoint.trim_end_matches('/');
        let base = endpoint.strip_suffix("/api/generate").unwrap_or(endpoint);
        format!("{}/api/tags", base)
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    fn kind(&self) -> Provider {
        Provider::Local
    }

    fn model_for(&self, mode: Mode) -> &str {
        self.config.model_for(mode)
    }

    async fn complete(&self, prompt: &str, mode: Mode) -> GenerationResult {
        let model = self.model_for(mode);
        debug!("Ollama request: model={} prompt_chars={}", model, prompt.chars().count());

        match self.request(prompt, model).await {
            Ok(text) => {
                let result = GenerationResult::from_completion(&text);
                if !result.is_answer() {
                    warn!("Ollama returned an empty response (model {})", model);
                }
                result
            }
            Err(e) => {
                warn!("Ollama error: {}", e);
                GenerationResult::failed(e.to_string())
            }
        }
    }
}

/// Ollama generate request
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f64,
}

/// Ollama generate response (non-streaming)
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}
