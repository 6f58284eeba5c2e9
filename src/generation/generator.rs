//! Answer generator: prompt assembly + provider dispatch

use std::sync::Arc;
use tracing::debug;

use crate::generation::prompts::build_prompt;
use crate::providers::CompletionProvider;
use crate::types::{GenerationResult, Mode, Provider, Query};

/// Drafts answers with the provider chosen at startup
pub struct AnswerGenerator {
    provider: Arc<dyn CompletionProvider>,
}

impl AnswerGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Generate an answer for `query` grounded on `context`.
    ///
    /// Never fails; provider errors arrive as `Fallback` or `Failed`.
    pub async fn generate(&self, context: &str, query: &Query, mode: Mode) -> GenerationResult {
        let prompt = build_prompt(context, query, mode);
        debug!(
            "Generating {} answer via {} ({})",
            mode,
            self.provider.kind(),
            self.provider.model_for(mode)
        );

        self.provider.complete(&prompt, mode).await
    }

    pub fn provider(&self) -> Provider {
        self.provider.kind()
    }
}
