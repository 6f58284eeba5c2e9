// Vector store - Qdrant nearest-neighbour search over ingested chunks
use async_trait::async_trait;
use qdrant_client::qdrant::{value::Kind, QueryPointsBuilder, ScoredPoint, Value as QdrantValue};
use qdrant_client::Qdrant;
use tracing::debug;

use crate::errors::{RfpError, Result};
use crate::knowledge::{KnowledgeChunk, VectorStore};

/// Payload key holding the chunk text
pub const TEXT_KEY: &str = "text";

/// Payload key holding the originating file name
pub const SOURCE_KEY: &str = "source_file";

/// Vector store backed by a Qdrant server
pub struct QdrantVectorStore {
    client: Qdrant,
    url: String,
}

impl QdrantVectorStore {
    /// Connect to a Qdrant server (gRPC URL, e.g. http://localhost:6334)
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| RfpError::VectorStoreError(format!("Failed to create Qdrant client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Check that the knowledge-base collection has been ingested
    pub async fn collection_exists(&self, collection: &str) -> Result<bool> {
        self.client
            .collection_exists(collection)
            .await
            .map_err(|e| RfpError::VectorStoreError(format!("Failed to check collection: {}", e)))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<KnowledgeChunk>> {
        let response = self.client
            .query(
                QueryPointsBuilder::new(collection)
                    .query(vector.to_vec())
                    .limit(limit as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| RfpError::VectorStoreError(format!("Failed to query points: {}", e)))?;

        debug!("Qdrant returned {} points from {}", response.result.len(), collection);

        Ok(response.result.into_iter().map(point_to_chunk).collect())
    }
}

fn point_to_chunk(point: ScoredPoint) -> KnowledgeChunk {
    let text = point.payload
        .get(TEXT_KEY)
        .and_then(qdrant_value_to_string)
        .unwrap_or_default();
    let source_file = point.payload
        .get(SOURCE_KEY)
        .and_then(qdrant_value_to_string)
        .unwrap_or_default();

    KnowledgeChunk::new(text, source_file, point.score)
}

fn qdrant_value_to_string(value: &QdrantValue) -> Option<String> {
    match value.kind.as_ref()? {
        Kind::StringValue(s) => Some(s.clone()),
        _ => None,
    }
}
