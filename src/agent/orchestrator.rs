//! Agentic orchestrator - retrieval + generation with bounded retries
//!
//! Each attempt retrieves fresh context and drafts an answer. The first
//! usable answer wins; retrieval errors, fallbacks and provider failures
//! are classified, logged and retried until the attempt budget runs out.

use tracing::{debug, info, warn};

use crate::agent::state::{AttemptOutcome, AttemptState};
use crate::generation::AnswerGenerator;
use crate::rag::ContextRetriever;
use crate::types::{GenerationResult, Mode, Query};

/// Retries after the first attempt
pub const DEFAULT_RETRIES: u32 = 2;

/// Final result plus per-attempt classification
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub result: GenerationResult,
    pub attempts: Vec<AttemptOutcome>,
}

impl AnswerOutcome {
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_success(&self) -> bool {
        self.result.is_answer()
    }
}

/// Main answer orchestrator
pub struct AgenticOrchestrator {
    retriever: ContextRetriever,
    generator: AnswerGenerator,
    retries: u32,
}

impl AgenticOrchestrator {
    /// Create orchestrator with the default retry budget
    pub fn new(retriever: ContextRetriever, generator: AnswerGenerator) -> Self {
        Self {
            retriever,
            generator,
            retries: DEFAULT_RETRIES,
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Answer `query` with the configured retry budget. Never fails.
    pub async fn answer(&self, query: &Query, mode: Mode) -> GenerationResult {
        self.answer_traced(query, mode, self.retries).await.result
    }

    /// Answer with an explicit retry budget (`retries + 1` attempts at most)
    pub async fn answer_with_retries(
        &self,
        query: &Query,
        mode: Mode,
        retries: u32,
    ) -> GenerationResult {
        self.answer_traced(query, mode, retries).await.result
    }

    /// Answer and report how each attempt ended
    pub async fn answer_traced(&self, query: &Query, mode: Mode, retries: u32) -> AnswerOutcome {
        let max_attempts = retries.saturating_add(1);
        let mut state = AttemptState::start();
        let mut attempts = Vec::new();

        while let AttemptState::Attempting(attempt) = state {
            let (outcome, answer) = self.attempt(query, mode, attempt, max_attempts).await;
            state = state.transition(outcome.event(), max_attempts);
            attempts.push(outcome);

            if let Some(text) = answer {
                debug!("[Agentic] Accepted answer on attempt {}", attempt);
                return AnswerOutcome {
                    result: GenerationResult::Answer(text),
                    attempts,
                };
            }
        }

        info!("[Agentic] All {} attempts exhausted. Returning fallback.", max_attempts);
        AnswerOutcome {
            result: GenerationResult::Fallback,
            attempts,
        }
    }

    /// One retrieve-then-generate pass
    async fn attempt(
        &self,
        query: &Query,
        mode: Mode,
        attempt: u32,
        max_attempts: u32,
    ) -> (AttemptOutcome, Option<String>) {
        debug!("[Agentic] Retrieving context (attempt {}/{})", attempt, max_attempts);
        let context = match self.retriever.retrieve(query, mode).await {
            Ok(context) => context,
            Err(e) => {
                warn!("[Agentic] Retrieval failed on attempt {}: {}", attempt, e);
                return (AttemptOutcome::RetrievalFailed(e.to_string()), None);
            }
        };

        if context.is_empty() {
            warn!("[Agentic] No context retrieved from knowledge base.");
        }

        debug!("[Agentic] Drafting response...");
        match self.generator.generate(&context.text, query, mode).await {
            GenerationResult::Answer(text) => (AttemptOutcome::Accepted, Some(text)),
            GenerationResult::Fallback => {
                warn!("[Agentic] Fallback response received on attempt {}.", attempt);
                (AttemptOutcome::Fallback, None)
            }
            GenerationResult::Failed(reason) => {
                warn!("[Agentic] Generation failed on attempt {}: {}", attempt, reason);
                (AttemptOutcome::GenerationFailed(reason), None)
            }
        }
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }
}
