// Local sentence embeddings
pub mod engine;

pub use engine::{EmbeddingEngine, MODEL_ID};
