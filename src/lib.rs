//! rfpbuddy - Retrieval-grounded RFP response generation
//!
//! Answers RFP compliance sheets and proposal sections from an ingested
//! knowledge base, using a local (Ollama) or cloud (Gemini) model.
//!
//! # Architecture
//!
//! - **knowledge**: sentence embeddings and the Qdrant vector store
//! - **rag**: per-mode retrieval budgets and sentence-safe context assembly
//! - **providers** / **generation**: prompt templates and completion backends
//! - **agent**: bounded retrieve-generate-validate loop
//! - **batch**: compliance workbook and proposal document consumers

pub mod errors;
pub mod types;
pub mod cli;
pub mod knowledge;
pub mod rag;
pub mod providers;
pub mod generation;
pub mod agent;
pub mod batch;
pub mod bootstrap;

// Re-export commonly used types
pub use errors::{RfpError, Result};
pub use types::{GenerationResult, Mode, Provider, Query, FALLBACK_RESPONSE};
pub use agent::AgenticOrchestrator;
