// Retrieval engine: query embedding + nearest-neighbour search + budgeting
use std::sync::Arc;
use tracing::debug;

use crate::cli::config::RetrievalConfig;
use crate::errors::{Result, RfpError};
use crate::knowledge::{EmbeddingProvider, VectorStore};
use crate::rag::context::{RetrievalBudget, RetrievedContext};
use crate::types::{Mode, Query};

/// Retrieves budgeted context for a query
pub struct ContextRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    collection: String,
    config: RetrievalConfig,
}

impl ContextRetriever {
    /// Create new retriever over `collection`
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            collection: collection.into(),
            config,
        }
    }

    /// Retrieve context for `query` under the budget of `mode`.
    ///
    /// An empty knowledge-base hit list yields an empty context, not an error.
    pub async fn retrieve(&self, query: &Query, mode: Mode) -> Result<RetrievedContext> {
        let budget = self.budget(mode);
        let vector = self.embed(query).await?;

        let chunks = self.store
            .query(&self.collection, &vector, budget.top_k)
            .await?;

        let context = RetrievedContext::assemble(&chunks, budget);
        debug!(
            "Retrieved {} chunks ({} chars) for {} query, sources: {:?}",
            context.chunk_count(),
            context.char_len(),
            mode,
            context.sources
        );

        Ok(context)
    }

    /// Embed on the blocking pool; model inference is CPU-bound
    async fn embed(&self, query: &Query) -> Result<Vec<f32>> {
        let embedder = Arc::clone(&self.embedder);
        let text = query.as_str().to_string();
        let vector = tokio::task::spawn_blocking(move || embedder.embed(&text))
            .await
            .map_err(|e| RfpError::EmbeddingError(format!("Embedding task failed: {}", e)))??;

        let expected = self.embedder.dimension();
        if vector.len() != expected {
            return Err(RfpError::EmbeddingError(format!(
                "Expected {}-dimensional embedding, got {}",
                expected,
                vector.len()
            )));
        }
        Ok(vector)
    }

    /// Budget applied for `mode`
    pub fn budget(&self, mode: Mode) -> RetrievalBudget {
        RetrievalBudget::for_mode(&self.config, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeChunk;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedEmbedder;

    impl EmbeddingProvider for FixedEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.5; 384])
        }
    }

    struct BrokenEmbedder;

    impl EmbeddingProvider for BrokenEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(RfpError::EmbeddingError("model not loaded".to_string()))
        }
    }

    struct PanickingEmbedder;

    impl EmbeddingProvider for PanickingEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            panic!("tokenizer crashed");
        }
    }

    struct TruncatedEmbedder;

    impl EmbeddingProvider for TruncatedEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.5; 12])
        }
    }

    /// Records the requested limit and returns up to that many chunks
    struct RecordingStore {
        chunks: Vec<KnowledgeChunk>,
        calls: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        async fn query(
            &self,
            collection: &str,
            _vector: &[f32],
            limit: usize,
        ) -> Result<Vec<KnowledgeChunk>> {
            self.calls.lock().unwrap().push((collection.to_string(), limit));
            Ok(self.chunks.iter().take(limit).cloned().collect())
        }
    }

    fn store_with(texts: &[&str]) -> Arc<RecordingStore> {
        Arc::new(RecordingStore {
            chunks: texts.iter().map(|t| KnowledgeChunk::new(*t, "kb.pdf", 0.8)).collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_compliance_uses_tight_budget() {
        let store = store_with(&["First chunk.", "Second chunk."]);
        let retriever = ContextRetriever::new(
            Arc::new(FixedEmbedder),
            store.clone(),
            "knowledge_base",
            RetrievalConfig::default(),
        );

        let context = retriever.retrieve(&Query::new("SSO"), Mode::Compliance).await.unwrap();

        assert_eq!(context.text, "First chunk.");
        assert_eq!(*store.calls.lock().unwrap(), vec![("knowledge_base".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_proposal_uses_broad_budget() {
        let store = store_with(&["A.", "B.", "C.", "D."]);
        let retriever = ContextRetriever::new(
            Arc::new(FixedEmbedder),
            store.clone(),
            "knowledge_base",
            RetrievalConfig::default(),
        );

        let context = retriever.retrieve(&Query::new("Security"), Mode::Answer).await.unwrap();

        assert_eq!(context.text, "A.\nB.\nC.");
        assert_eq!(store.calls.lock().unwrap()[0].1, 3);
    }

    #[tokio::test]
    async fn test_no_hits_gives_empty_context() {
        let retriever = ContextRetriever::new(
            Arc::new(FixedEmbedder),
            store_with(&[]),
            "knowledge_base",
            RetrievalConfig::default(),
        );

        let context = retriever.retrieve(&Query::new("anything"), Mode::Proposal).await.unwrap();
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn test_context_respects_mode_budget() {
        let long = "word ".repeat(400);
        let store = store_with(&[long.as_str(), long.as_str(), long.as_str()]);
        let retriever = ContextRetriever::new(
            Arc::new(FixedEmbedder),
            store,
            "knowledge_base",
            RetrievalConfig::default(),
        );

        let compliance = retriever.retrieve(&Query::new("q"), Mode::Compliance).await.unwrap();
        let proposal = retriever.retrieve(&Query::new("q"), Mode::Proposal).await.unwrap();

        assert!(compliance.char_len() <= 800);
        assert!(proposal.char_len() <= 2000);
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let retriever = ContextRetriever::new(
            Arc::new(BrokenEmbedder),
            store_with(&["unused."]),
            "knowledge_base",
            RetrievalConfig::default(),
        );

        let result = retriever.retrieve(&Query::new("q"), Mode::Compliance).await;
        assert!(matches!(result, Err(RfpError::EmbeddingError(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_embedding_panic_becomes_error() {
        let store = store_with(&["unused."]);
        let retriever = ContextRetriever::new(
            Arc::new(PanickingEmbedder),
            store.clone(),
            "knowledge_base",
            RetrievalConfig::default(),
        );

        let result = retriever.retrieve(&Query::new("q"), Mode::Compliance).await;
        assert!(matches!(result, Err(RfpError::EmbeddingError(_))));
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_rejected() {
        let store = store_with(&["unused."]);
        let retriever = ContextRetriever::new(
            Arc::new(TruncatedEmbedder),
            store.clone(),
            "knowledge_base",
            RetrievalConfig::default(),
        );

        let result = retriever.retrieve(&Query::new("q"), Mode::Proposal).await;
        assert!(matches!(result, Err(RfpError::EmbeddingError(_))));
        assert!(store.calls.lock().unwrap().is_empty());
    }
}
