//! Markdown response document
//!
//! An ordered list of heading and paragraph blocks, persisted as Markdown.
//! Paragraph lines that would read back as headings are escaped with `\`.

use std::collections::HashSet;
use std::path::Path;

use crate::errors::{RfpError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDocument {
    blocks: Vec<Block>,
}

impl ResponseDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Headings are single-line in Markdown, so inner line breaks become spaces
    pub fn add_heading(&mut self, text: &str, level: u8) {
        self.blocks.push(Block::Heading {
            level: level.clamp(1, 6),
            text: heading_text(text),
        });
    }

    pub fn add_paragraph(&mut self, text: &str) {
        self.blocks.push(Block::Paragraph(text.trim().to_string()));
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Headings immediately followed by a non-empty paragraph
    pub fn completed_headings(&self) -> HashSet<String> {
        self.blocks
            .windows(2)
            .filter_map(|pair| match pair {
                [Block::Heading { text, .. }, Block::Paragraph(body)] if !body.trim().is_empty() => {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn to_markdown(&self) -> String {
        let mut rendered = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            match block {
                Block::Heading { level, text } => {
                    rendered.push(format!("{} {}", "#".repeat(*level as usize), text));
                }
                Block::Paragraph(body) => {
                    let escaped = body
                        .lines()
                        .map(escape_line)
                        .collect::<Vec<_>>()
                        .join("\n");
                    rendered.push(escaped);
                }
            }
        }

        let mut markdown = rendered.join("\n\n");
        markdown.push('\n');
        markdown
    }

    pub fn parse_markdown(markdown: &str) -> Self {
        let mut doc = Self::new();
        let mut paragraph: Vec<String> = Vec::new();

        for line in markdown.lines() {
            if let Some((level, text)) = parse_heading(line) {
                doc.flush_paragraph(&mut paragraph);
                doc.add_heading(text, level);
            } else if line.trim().is_empty() {
                doc.flush_paragraph(&mut paragraph);
            } else {
                paragraph.push(unescape_line(line).to_string());
            }
        }
        doc.flush_paragraph(&mut paragraph);

        doc
    }

    fn flush_paragraph(&mut self, lines: &mut Vec<String>) {
        if !lines.is_empty() {
            self.add_paragraph(&lines.join("\n"));
            lines.clear();
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let markdown = std::fs::read_to_string(path).map_err(|e| {
            RfpError::DocumentError(format!("Failed to read document {}: {}", path.display(), e))
        })?;
        Ok(Self::parse_markdown(&markdown))
    }

    /// Write through a sibling temp file so a crash never leaves a torn document
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("md.tmp");
        std::fs::write(&tmp, self.to_markdown())?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// Heading as stored: whitespace runs collapsed to one space
pub fn heading_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    rest.strip_prefix(' ').map(|text| (hashes as u8, text.trim()))
}

fn escape_line(line: &str) -> String {
    if line.starts_with('#') || line.starts_with('\\') {
        format!("\\{}", line)
    } else {
        line.to_string()
    }
}

fn unescape_line(line: &str) -> &str {
    line.strip_prefix('\\').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_completed_headings_need_body() {
        let mut doc = ResponseDocument::new();
        doc.add_heading("Security", 1);
        doc.add_paragraph("All data is encrypted at rest.");
        doc.add_heading("Support", 1);
        doc.add_heading("Pricing", 1);
        doc.add_paragraph("   ");

        let done = doc.completed_headings();
        assert!(done.contains("Security"));
        assert!(!done.contains("Support"));
        assert!(!done.contains("Pricing"));
    }

    #[test]
    fn test_multiline_heading_survives_reload() {
        let mut doc = ResponseDocument::new();
        doc.add_heading("OAuth2\nsupport  for\r\nSSO", 2);
        doc.add_paragraph("Supported via the identity gateway.");

        let reloaded = ResponseDocument::parse_markdown(&doc.to_markdown());
        assert_eq!(reloaded, doc);
        assert!(reloaded.completed_headings().contains("OAuth2 support for SSO"));
    }

    #[test]
    fn test_markdown_shape() {
        let mut doc = ResponseDocument::new();
        doc.add_heading("Compliance Responses - Sheet1", 1);
        doc.add_heading("OAuth2 support", 2);
        doc.add_paragraph("YES\nSupported via the identity gateway.");

        assert_eq!(
            doc.to_markdown(),
            "# Compliance Responses - Sheet1\n\n## OAuth2 support\n\nYES\nSupported via the identity gateway.\n"
        );
    }

    #[test]
    fn test_paragraph_hash_lines_survive_reload() {
        let mut doc = ResponseDocument::new();
        doc.add_heading("Security", 1);
        doc.add_paragraph("# not a heading\n\\ literal backslash");

        let reloaded = ResponseDocument::parse_markdown(&doc.to_markdown());
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_parse_multi_paragraph_response() {
        let doc = ResponseDocument::parse_markdown("# Security\n\nFirst.\n\nSecond.\n\n# Support\n");
        assert_eq!(doc.blocks().len(), 4);
        assert_eq!(doc.completed_headings().len(), 1);
    }

    #[test]
    fn test_hashtag_without_space_is_text() {
        let doc = ResponseDocument::parse_markdown("#hashtag\n");
        assert_eq!(doc.blocks(), &[Block::Paragraph("#hashtag".to_string())]);
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rfp_proposal.md");

        let mut doc = ResponseDocument::new();
        doc.add_heading("Security", 1);
        doc.add_paragraph("Encrypted.");
        doc.save(&path).unwrap();

        assert!(!path.with_extension("md.tmp").exists());
        assert_eq!(ResponseDocument::load(&path).unwrap(), doc);
    }
}
