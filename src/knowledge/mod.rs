//! Knowledge base access
//!
//! The two external leaves of the retrieval path:
//! - Embedding: text to fixed-size vector
//! - Vector DB: nearest-neighbour search over stored chunks
//!
//! Both sit behind traits so the retriever can be driven by in-memory
//! doubles in tests.

pub mod embedding;
pub mod vector_db;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Dimension of all-MiniLM-L6-v2 sentence embeddings
pub const EMBEDDING_DIM: usize = 384;

/// Converts text to a fixed-dimension vector
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// A stored chunk returned by a similarity query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub text: String,
    pub source_file: String,
    pub score: f32,
}

impl KnowledgeChunk {
    pub fn new(text: impl Into<String>, source_file: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            source_file: source_file.into(),
            score,
        }
    }
}

/// Nearest-neighbour search over a named collection
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Top `limit` chunks ordered by descending similarity
    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<KnowledgeChunk>>;
}

pub use embedding::EmbeddingEngine;
pub use vector_db::QdrantVectorStore;
