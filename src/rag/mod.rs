// RAG (Retrieval-Augmented Generation) context path
//
// Components:
// - Retrieval: embed the query and search the knowledge base
// - Context: per-mode budgets and chunk assembly
// - Truncate: sentence-safe character cuts

pub mod retrieval;
pub mod context;
pub mod truncate;

// Re-export key types
pub use retrieval::ContextRetriever;
pub use context::{RetrievalBudget, RetrievedContext};
pub use truncate::truncate_at_sentence;
