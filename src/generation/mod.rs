//! Answer generation
//!
//! Mode-specific prompt templates and the generator that dispatches them to
//! the configured completion provider.

pub mod prompts;
pub mod generator;

// Re-export commonly used types
pub use generator::AnswerGenerator;
pub use prompts::{build_prompt, system_prompt};
