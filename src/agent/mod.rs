//! Agent orchestration module
//!
//! The bounded retry loop around retrieval and generation.

pub mod state;
pub mod orchestrator;

// Re-export commonly used types
pub use state::{AttemptEvent, AttemptOutcome, AttemptState};
pub use orchestrator::{AgenticOrchestrator, AnswerOutcome, DEFAULT_RETRIES};
