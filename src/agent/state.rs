//! Attempt state machine for the answer loop
//!
//! Deterministic and bounded:
//! - Attempting(n) → Success    (on: Accepted)
//! - Attempting(n) → Attempting(n + 1)  (on: Rejected, n < max)
//! - Attempting(n) → Exhausted  (on: Rejected, n = max)
//! - Success / Exhausted absorb every event

use serde::{Deserialize, Serialize};

/// Answer loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttemptState {
    /// Attempt number `n` (1-based) in progress
    Attempting(u32),

    /// A usable answer was accepted (terminal)
    Success,

    /// Every attempt was rejected (terminal)
    Exhausted,
}

/// Verdict on a finished attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptEvent {
    Accepted,
    Rejected,
}

/// Why an attempt ended the way it did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Answer accepted
    Accepted,
    /// Embedding or vector store failure
    RetrievalFailed(String),
    /// Provider answered with nothing usable
    Fallback,
    /// Provider request failed
    GenerationFailed(String),
}

impl AttemptOutcome {
    pub fn event(&self) -> AttemptEvent {
        match self {
            AttemptOutcome::Accepted => AttemptEvent::Accepted,
            _ => AttemptEvent::Rejected,
        }
    }
}

impl AttemptState {
    pub fn start() -> Self {
        AttemptState::Attempting(1)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptState::Success | AttemptState::Exhausted)
    }

    /// Next state after `event`, allowing at most `max_attempts` attempts
    pub fn transition(self, event: AttemptEvent, max_attempts: u32) -> AttemptState {
        match (self, event) {
            (AttemptState::Attempting(_), AttemptEvent::Accepted) => AttemptState::Success,
            (AttemptState::Attempting(n), AttemptEvent::Rejected) if n < max_attempts => {
                AttemptState::Attempting(n + 1)
            }
            (AttemptState::Attempting(_), AttemptEvent::Rejected) => AttemptState::Exhausted,
            (terminal, _) => terminal,
        }
    }
}
