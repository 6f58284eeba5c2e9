// Context retrieval against the knowledge base
pub mod engine;

pub use engine::ContextRetriever;
