// Context assembly for RAG-augmented prompts
use serde::{Deserialize, Serialize};

use crate::cli::config::RetrievalConfig;
use crate::knowledge::KnowledgeChunk;
use crate::rag::truncate::truncate_at_sentence;
use crate::types::Mode;

/// Retrieval limits for one mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalBudget {
    /// Maximum number of chunks to retrieve
    pub top_k: usize,
    /// Character budget for the assembled context
    pub max_context_chars: usize,
}

impl RetrievalBudget {
    pub fn new(top_k: usize, max_context_chars: usize) -> Self {
        Self {
            top_k,
            max_context_chars,
        }
    }

    /// Compliance uses the sheet budget, proposal and answer the document one
    pub fn for_mode(config: &RetrievalConfig, mode: Mode) -> Self {
        Self::new(config.top_k(mode), config.max_context(mode))
    }

    /// Share of the budget each chunk may use
    pub fn per_chunk_chars(&self) -> usize {
        self.max_context_chars / self.top_k.max(1)
    }
}

/// Context handed to the generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievedContext {
    /// Chunk texts joined by newlines
    pub text: String,
    /// Source file of each included chunk, in retrieval order
    pub sources: Vec<String>,
}

impl RetrievedContext {
    /// Build context from ranked chunks within `budget`.
    ///
    /// Blank chunks are dropped. Each chunk is cut to its share, then the
    /// joined text is cut to the full budget.
    pub fn assemble(chunks: &[KnowledgeChunk], budget: RetrievalBudget) -> Self {
        let per_chunk = budget.per_chunk_chars();
        let mut parts = Vec::new();
        let mut sources = Vec::new();

        for chunk in chunks {
            let text = chunk.text.trim();
            if text.is_empty() {
                continue;
            }
            parts.push(truncate_at_sentence(text, per_chunk));
            sources.push(chunk.source_file.clone());
        }

        let joined = parts.join("\n");
        let text = truncate_at_sentence(&joined, budget.max_context_chars).to_string();

        Self { text, sources }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn chunk_count(&self) -> usize {
        self.sources.len()
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
