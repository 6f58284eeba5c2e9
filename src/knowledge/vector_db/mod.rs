// Qdrant-backed vector store
pub mod manager;

pub use manager::QdrantVectorStore;
