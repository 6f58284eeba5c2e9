//! Type definitions module
//!
//! Core values flowing through retrieval, generation and the batch consumers.

pub mod mode;
pub mod generation;
pub mod verdict;

// Re-export commonly used types
pub use mode::{Mode, Provider, Query};
pub use generation::{GenerationResult, FALLBACK_RESPONSE};
pub use verdict::{ComplianceVerdict, Verdict};
