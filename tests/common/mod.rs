//! Shared doubles for integration tests
//!
//! In-memory embedder, vector store and completion provider so the full
//! retrieve-generate loop runs without a model server or Qdrant.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rfpbuddy::{
    agent::AgenticOrchestrator,
    bootstrap::Bootstrap,
    cli::Config,
    knowledge::{EmbeddingProvider, KnowledgeChunk, VectorStore, EMBEDDING_DIM},
    providers::CompletionProvider,
    types::{GenerationResult, Mode, Provider},
    Result, RfpError,
};

pub struct MockEmbedder;

impl EmbeddingProvider for MockEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let seed = (text.len() % 7) as f32 + 1.0;
        Ok(vec![seed / 10.0; EMBEDDING_DIM])
    }
}

/// Returns fixed chunks, or fails every query when `fail` is set
pub struct MockVectorStore {
    chunks: Vec<KnowledgeChunk>,
    fail: bool,
    pub queries: AtomicUsize,
}

impl MockVectorStore {
    pub fn with_texts(texts: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            chunks: texts
                .iter()
                .map(|text| KnowledgeChunk::new(*text, "product_guide.pdf", 0.9))
                .collect(),
            fail: false,
            queries: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            chunks: Vec::new(),
            fail: true,
            queries: AtomicUsize::new(0),
        })
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn query(
        &self,
        _collection: &str,
        _vector: &[f32],
        limit: usize,
    ) -> Result<Vec<KnowledgeChunk>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RfpError::VectorStoreError("connection refused".to_string()));
        }
        Ok(self.chunks.iter().take(limit).cloned().collect())
    }
}

/// Replays scripted results in order, then repeats `default`
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<GenerationResult>>,
    default: GenerationResult,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<GenerationResult>, default: GenerationResult) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            default,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn always(reply: GenerationResult) -> Arc<Self> {
        Self::new(Vec::new(), reply)
    }

    pub fn answers(texts: &[&str]) -> Arc<Self> {
        Self::new(
            texts.iter().map(|text| GenerationResult::Answer(text.to_string())).collect(),
            GenerationResult::Fallback,
        )
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn kind(&self) -> Provider {
        Provider::Local
    }

    fn model_for(&self, _mode: Mode) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str, _mode: Mode) -> GenerationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default.clone())
    }
}

/// Orchestrator over the doubles with `retries` extra attempts
pub fn orchestrator(
    store: Arc<dyn VectorStore>,
    provider: Arc<dyn CompletionProvider>,
    retries: u32,
) -> AgenticOrchestrator {
    let mut config = Config::default();
    config.agent.retries = retries;
    Bootstrap::assemble(&config, Arc::new(MockEmbedder), store, provider)
}
