//! Compliance verdict parsing

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compliance cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Yes,
    No,
    Partial,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Yes => "YES",
            Verdict::No => "NO",
            Verdict::Partial => "PARTIAL",
        }
    }

    /// Match a token case-insensitively, ignoring surrounding whitespace
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_uppercase().as_str() {
            "YES" => Some(Verdict::Yes),
            "NO" => Some(Verdict::No),
            "PARTIAL" => Some(Verdict::Partial),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict plus remarks derived from a compliance response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    pub verdict: Verdict,
    pub remarks: String,
    /// First line was not a recognised token and was coerced to PARTIAL
    pub coerced: bool,
}

impl ComplianceVerdict {
    /// Parse the first line as the verdict and the rest as remarks.
    ///
    /// Unrecognised first lines become `PARTIAL`; the response is never
    /// rejected.
    pub fn parse(response: &str) -> Self {
        let mut lines = response.split('\n');
        let first = lines.next().unwrap_or_default();
        let remarks = lines.collect::<Vec<_>>().join("\n").trim().to_string();

        match Verdict::from_token(first) {
            Some(verdict) => Self {
                verdict,
                remarks,
                coerced: false,
            },
            None => Self {
                verdict: Verdict::Partial,
                remarks,
                coerced: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FALLBACK_RESPONSE;

    #[test]
    fn test_parse_yes() {
        let parsed = ComplianceVerdict::parse("YES\nFully compliant via OAuth2 module.");
        assert_eq!(parsed.verdict, Verdict::Yes);
        assert_eq!(parsed.remarks, "Fully compliant via OAuth2 module.");
        assert!(!parsed.coerced);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(ComplianceVerdict::parse("  no \nnot offered").verdict, Verdict::No);
        assert_eq!(ComplianceVerdict::parse("Partial\nroadmap").verdict, Verdict::Partial);
    }

    #[test]
    fn test_unknown_token_coerces_to_partial() {
        let parsed = ComplianceVerdict::parse("Maybe\nsome text");
        assert_eq!(parsed.verdict, Verdict::Partial);
        assert_eq!(parsed.remarks, "some text");
        // Lenient by choice: malformed verdict lines are flagged, not retried.
        assert!(parsed.coerced);
    }

    #[test]
    fn test_verdict_with_trailing_prose_is_coerced() {
        let parsed = ComplianceVerdict::parse("YES, fully supported\nDetails");
        assert_eq!(parsed.verdict, Verdict::Partial);
        assert!(parsed.coerced);
    }

    #[test]
    fn test_fallback_sentinel_becomes_partial_with_empty_remarks() {
        let parsed = ComplianceVerdict::parse(FALLBACK_RESPONSE);
        assert_eq!(parsed.verdict, Verdict::Partial);
        assert!(parsed.remarks.is_empty());
    }

    #[test]
    fn test_multiline_remarks_preserved() {
        let parsed = ComplianceVerdict::parse("YES\nline one\nline two\n");
        assert_eq!(parsed.remarks, "line one\nline two");
    }
}
