//! Generation modes, providers and queries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generation mode: selects retrieval budget, prompt template and model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// YES/NO/PARTIAL verdict plus justification (compliance sheets)
    Compliance,
    /// Structured prose for an RFP section
    Proposal,
    /// General answer; same policy as `Proposal`
    Answer,
}

impl Mode {
    /// Compliance uses the tight (sheet) policy, everything else the broad one
    pub fn is_compliance(&self) -> bool {
        matches!(self, Mode::Compliance)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Compliance => "compliance",
            Mode::Proposal => "proposal",
            Mode::Answer => "answer",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compliance" | "excel" => Ok(Mode::Compliance),
            "proposal" | "pdf" => Ok(Mode::Proposal),
            "answer" => Ok(Mode::Answer),
            other => Err(format!("Unknown mode: {}", other)),
        }
    }
}

/// Completion backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Local model server (Ollama)
    #[serde(alias = "ollama")]
    Local,
    /// Cloud API (Gemini)
    #[serde(alias = "gemini")]
    Cloud,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Local => "local",
            Provider::Cloud => "cloud",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "ollama" => Ok(Provider::Local),
            "cloud" | "gemini" => Ok(Provider::Cloud),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// A question or enriched requirement sent through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Self(text)
    }
}
