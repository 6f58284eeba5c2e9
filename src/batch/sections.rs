//! RFP section parser
//!
//! Splits plain-text RFP pages (form-feed separated) into heading/bullet
//! sections. Headings are recognised purely from text shape:
//! - numbered: `1 Scope`, `4.2 Integration`
//! - lettered: `A. Overview`
//! - ALL CAPS with more than one word: `TECHNICAL REQUIREMENTS`

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{RfpError, Result};

/// Page separator in extracted RFP text
pub const PAGE_BREAK: char = '\u{000C}';

/// Heading plus the content lines under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub bullets: Vec<String>,
}

impl Section {
    pub fn new(heading: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            bullets,
        }
    }

    /// Non-blank bullets, trimmed
    pub fn requirements(&self) -> impl Iterator<Item = &str> {
        self.bullets
            .iter()
            .map(|bullet| bullet.trim())
            .filter(|bullet| !bullet.is_empty())
    }
}

pub struct SectionParser {
    numbered: Regex,
    lettered: Regex,
    all_caps: Regex,
}

impl SectionParser {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| RfpError::DocumentError(format!("Invalid heading pattern: {}", e)))
        };

        Ok(Self {
            numbered: compile(r"^\d+(\.\d+)*\s+\S+")?,
            lettered: compile(r"^[A-Z]\.\s+\S+")?,
            all_caps: compile(r"^[A-Z][A-Z\s]{3,}$")?,
        })
    }

    pub fn is_heading(&self, line: &str) -> bool {
        self.numbered.is_match(line)
            || self.lettered.is_match(line)
            || (self.all_caps.is_match(line) && line.split_whitespace().count() > 1)
    }

    /// Parse pages `start_page..=end_page` (1-based, end clamped to the page count)
    pub fn parse(&self, text: &str, start_page: usize, end_page: usize) -> Result<Vec<Section>> {
        if start_page == 0 {
            return Err(RfpError::DocumentError("start page must be at least 1".to_string()));
        }
        if end_page < start_page {
            return Err(RfpError::DocumentError(format!(
                "end page {} is before start page {}",
                end_page, start_page
            )));
        }

        let pages: Vec<&str> = text.split(PAGE_BREAK).collect();
        let total = pages.len();
        let end_page = end_page.min(total);
        info!("Parsing pages {} to {} of {} total", start_page, end_page, total);

        let mut sections = Vec::new();
        let mut current: Option<Section> = None;

        for page in pages.iter().take(end_page).skip(start_page - 1) {
            for line in page.lines().map(str::trim).filter(|line| !line.is_empty()) {
                if self.is_heading(line) {
                    if let Some(done) = current.take() {
                        sections.push(done);
                    }
                    current = Some(Section::new(line, Vec::new()));
                } else if let Some(section) = current.as_mut() {
                    section.bullets.push(line.to_string());
                }
            }
        }
        sections.extend(current);

        info!("Total sections detected: {}", sections.len());
        Ok(sections)
    }
}

/// Parse with the default heading patterns
pub fn parse_sections(text: &str, start_page: usize, end_page: usize) -> Result<Vec<Section>> {
    SectionParser::new()?.parse(text, start_page, end_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFP: &str = "Cover letter text\n1 Scope\nDeliver a platform.\n\u{000C}4.2 Security\n  Encrypt data at rest.\n\nSupport SSO.\n\u{000C}TECHNICAL REQUIREMENTS\nHigh availability.\nB. Pricing\nFixed fee.";

    #[test]
    fn test_heading_patterns() {
        let parser = SectionParser::new().unwrap();
        assert!(parser.is_heading("1 Scope"));
        assert!(parser.is_heading("3.1.2 Data Retention"));
        assert!(parser.is_heading("A. Overview"));
        assert!(parser.is_heading("TECHNICAL REQUIREMENTS"));

        assert!(!parser.is_heading("OVERVIEW"));
        assert!(!parser.is_heading("1."));
        assert!(!parser.is_heading("Encrypt data at rest."));
        assert!(!parser.is_heading("All Caps Mixed"));
    }

    #[test]
    fn test_parse_all_pages() {
        let sections = parse_sections(RFP, 1, 10).unwrap();
        let headings: Vec<&str> = sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec!["1 Scope", "4.2 Security", "TECHNICAL REQUIREMENTS", "B. Pricing"]
        );
        assert_eq!(sections[1].bullets, vec!["Encrypt data at rest.", "Support SSO."]);
    }

    #[test]
    fn test_lines_before_first_heading_dropped() {
        let sections = parse_sections(RFP, 1, 1).unwrap();
        assert_eq!(sections, vec![Section::new("1 Scope", vec!["Deliver a platform.".to_string()])]);
    }

    #[test]
    fn test_page_range_is_inclusive_and_clamped() {
        let sections = parse_sections(RFP, 2, 99).unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].heading, "4.2 Security");

        let second_only = parse_sections(RFP, 2, 2).unwrap();
        assert_eq!(second_only.len(), 1);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(parse_sections(RFP, 0, 2).is_err());
        assert!(parse_sections(RFP, 3, 2).is_err());
    }

    #[test]
    fn test_requirements_skip_blank_bullets() {
        let section = Section::new("Support", vec!["  ".to_string(), " 24x7 desk ".to_string()]);
        assert_eq!(section.requirements().collect::<Vec<_>>(), vec!["24x7 desk"]);
    }
}
