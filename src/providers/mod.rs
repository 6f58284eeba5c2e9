//! Completion providers
//!
//! One capability trait with a local (Ollama) and a cloud (Gemini) backend.
//! A provider is selected once at startup; every request outcome is folded
//! into a [`GenerationResult`], so callers never see transport errors.

pub mod ollama;
pub mod gemini;

#[cfg(test)]
mod test_server;

use async_trait::async_trait;

use crate::types::{GenerationResult, Mode, Provider};

/// Sampling temperature shared by both backends
pub const TEMPERATURE: f64 = 0.3;

/// Text completion backend
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Which backend this is
    fn kind(&self) -> Provider;

    /// Model name used for `mode`
    fn model_for(&self, mode: Mode) -> &str;

    /// Complete `prompt` with the model for `mode`. Never fails.
    async fn complete(&self, prompt: &str, mode: Mode) -> GenerationResult;
}

// Re-export commonly used types
pub use ollama::OllamaProvider;
pub use gemini::GeminiProvider;
