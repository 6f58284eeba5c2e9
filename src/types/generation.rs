//! Generation results
//!
//! Providers never raise: every outcome is folded into a [`GenerationResult`].
//! The sentinel text only appears when a result is rendered.

use serde::{Deserialize, Serialize};

/// Text rendered for every non-answer outcome
pub const FALLBACK_RESPONSE: &str =
    "Based on the current knowledge base, limited information is available.";

/// Outcome of a single completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum GenerationResult {
    /// Non-empty provider text
    Answer(String),
    /// Provider answered but produced nothing usable
    Fallback,
    /// Transport or provider failure
    Failed(String),
}

impl GenerationResult {
    /// Normalize raw provider output.
    ///
    /// Blank text and text equal to the sentinel collapse to `Fallback`.
    pub fn from_completion(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == FALLBACK_RESPONSE {
            GenerationResult::Fallback
        } else {
            GenerationResult::Answer(trimmed.to_string())
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        GenerationResult::Failed(reason.into())
    }

    /// True only for a usable answer
    pub fn is_answer(&self) -> bool {
        matches!(self, GenerationResult::Answer(_))
    }

    /// Rendered text, never empty
    pub fn text(&self) -> &str {
        match self {
            GenerationResult::Answer(text) => text,
            GenerationResult::Fallback | GenerationResult::Failed(_) => FALLBACK_RESPONSE,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            GenerationResult::Answer(text) => text,
            GenerationResult::Fallback | GenerationResult::Failed(_) => {
                FALLBACK_RESPONSE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_completion_is_fallback() {
        assert_eq!(GenerationResult::from_completion(""), GenerationResult::Fallback);
        assert_eq!(GenerationResult::from_completion("  \n\t"), GenerationResult::Fallback);
    }

    #[test]
    fn test_sentinel_completion_is_fallback() {
        let echoed = format!("  {}\n", FALLBACK_RESPONSE);
        assert_eq!(GenerationResult::from_completion(&echoed), GenerationResult::Fallback);
    }

    #[test]
    fn test_answer_is_trimmed() {
        let result = GenerationResult::from_completion("\nYES\nSupported.\n ");
        assert_eq!(result, GenerationResult::Answer("YES\nSupported.".to_string()));
        assert!(result.is_answer());
    }

    #[test]
    fn test_non_answers_render_sentinel() {
        assert_eq!(GenerationResult::Fallback.text(), FALLBACK_RESPONSE);
        assert_eq!(GenerationResult::failed("timeout").text(), FALLBACK_RESPONSE);
        assert!(!GenerationResult::failed("timeout").is_answer());
        assert_eq!(GenerationResult::Fallback.into_text(), FALLBACK_RESPONSE);
    }
}
