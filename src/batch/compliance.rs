//! Compliance sheet processor
//!
//! Walks every worksheet row by row. Section header rows set a label that
//! enriches the following requirement queries; requirement rows are answered
//! in compliance mode and the verdict and remarks are written back.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::agent::AgenticOrchestrator;
use crate::batch::document::ResponseDocument;
use crate::batch::sheet::{Workbook, Worksheet};
use crate::errors::Result;
use crate::types::{ComplianceVerdict, GenerationResult, Mode, Query};

pub const FEATURE_COLUMN: &str = "Feature / Capability";
pub const COMPLIANCE_COLUMN: &str = "Compliance (Yes/No/Partial)";
pub const REMARKS_COLUMN: &str = "Remarks / Notes  (For Partial put remarks of capability)";

/// Short rows with nothing filled in are treated as section headers
pub const HEADER_MAX_CHARS: usize = 60;

/// Empty or the literal `nan` left behind by spreadsheet exports
pub fn is_blank_cell(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("nan")
}

/// Header if the text ends with `:`, or compliance and remarks are both
/// blank and the text is shorter than [`HEADER_MAX_CHARS`]
pub fn is_section_header(text: &str, compliance: &str, remarks: &str) -> bool {
    let text = text.trim();
    if text.ends_with(':') {
        return true;
    }

    is_blank_cell(compliance) && is_blank_cell(remarks) && text.chars().count() < HEADER_MAX_CHARS
}

/// `"{section} {text}"`, or just the text outside any section
pub fn enriched_query(section: &str, text: &str) -> Query {
    if section.is_empty() {
        Query::new(text.trim())
    } else {
        Query::new(format!("{} {}", section, text).trim())
    }
}

/// Per-sheet counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSummary {
    pub name: String,
    pub processed: usize,
    pub skipped: usize,
    /// Rows written with the fallback response after every attempt
    pub errors: usize,
    pub headers: usize,
    /// No feature column; the sheet was copied unchanged
    pub passed_through: bool,
}

/// Workbook-level report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub sheets: Vec<SheetSummary>,
}

impl ComplianceReport {
    pub fn processed(&self) -> usize {
        self.sheets.iter().map(|s| s.processed).sum()
    }

    pub fn skipped(&self) -> usize {
        self.sheets.iter().map(|s| s.skipped).sum()
    }

    pub fn errors(&self) -> usize {
        self.sheets.iter().map(|s| s.errors).sum()
    }
}

pub struct ComplianceProcessor<'a> {
    orchestrator: &'a AgenticOrchestrator,
}

impl<'a> ComplianceProcessor<'a> {
    pub fn new(orchestrator: &'a AgenticOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Answer one requirement under an optional section label
    pub async fn answer_requirement(
        &self,
        section: &str,
        text: &str,
    ) -> (ComplianceVerdict, GenerationResult) {
        let query = enriched_query(section, text);
        let result = self.orchestrator.answer(&query, Mode::Compliance).await;
        let verdict = ComplianceVerdict::parse(result.text());

        if verdict.coerced {
            warn!(
                "Unrecognised verdict line for '{}', recorded as {}",
                truncate_label(text),
                verdict.verdict
            );
        }

        (verdict, result)
    }

    /// Fill one sheet in place, appending responses to `summary_doc`
    pub async fn process_sheet(
        &self,
        sheet: &mut Worksheet,
        summary_doc: &mut ResponseDocument,
    ) -> SheetSummary {
        info!("Processing sheet: {}", sheet.name);
        let mut summary = SheetSummary {
            name: sheet.name.clone(),
            ..Default::default()
        };

        sheet.normalize_columns();
        let Some(feature_col) = sheet.column_index(FEATURE_COLUMN) else {
            info!("Skipping sheet '{}' (no '{}' column found)", sheet.name, FEATURE_COLUMN);
            summary.passed_through = true;
            return summary;
        };
        let compliance_col = sheet.ensure_column(COMPLIANCE_COLUMN);
        let remarks_col = sheet.ensure_column(REMARKS_COLUMN);

        let mut section = String::new();

        for row in 0..sheet.row_count() {
            let text = sheet.cell(row, feature_col).trim().to_string();
            if is_blank_cell(&text) {
                summary.skipped += 1;
                continue;
            }

            if is_section_header(&text, sheet.cell(row, compliance_col), sheet.cell(row, remarks_col)) {
                section = text.trim_end_matches(':').trim_end().to_string();
                debug!("Section: {}", section);
                summary.headers += 1;
                continue;
            }

            // +2: one-based and below the header row
            info!("Row {}: {}", row + 2, truncate_label(&text));
            let (verdict, result) = self.answer_requirement(&section, &text).await;

            sheet.set_cell(row, compliance_col, verdict.verdict.as_str());
            sheet.set_cell(row, remarks_col, verdict.remarks.as_str());
            summary_doc.add_heading(&text, 2);
            summary_doc.add_paragraph(result.text());

            if result.is_answer() {
                summary.processed += 1;
            } else {
                warn!("Row {}: no grounded answer after every attempt", row + 2);
                summary.errors += 1;
            }
        }

        info!(
            "Sheet '{}' complete - Processed: {} | Skipped: {} | Errors: {}",
            summary.name, summary.processed, summary.skipped, summary.errors
        );
        summary
    }

    pub async fn process_workbook(
        &self,
        workbook: &mut Workbook,
        summary_doc: &mut ResponseDocument,
    ) -> ComplianceReport {
        let mut report = ComplianceReport::default();
        for sheet in &mut workbook.sheets {
            let summary = self.process_sheet(sheet, summary_doc).await;
            report.sheets.push(summary);
        }
        report
    }

    /// Load `input`, fill it, write the filled workbook and the summary document
    pub async fn process_file(
        &self,
        input: &Path,
        output: &Path,
        summary_output: &Path,
    ) -> Result<ComplianceReport> {
        let mut workbook = Workbook::load(input)?;
        let mut summary_doc = ResponseDocument::new();

        let report = self.process_workbook(&mut workbook, &mut summary_doc).await;

        workbook.save(output)?;
        summary_doc.save(summary_output)?;
        info!("Compliance processing complete.");
        Ok(report)
    }
}

fn truncate_label(text: &str) -> String {
    text.chars().take(HEADER_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_classification() {
        assert!(is_section_header("Technical Requirements:", "", ""));
        assert!(is_section_header("Supports SSO", "", ""));
        assert!(is_section_header("Supports SSO", "nan", "nan"));
        assert!(!is_section_header(
            "Supports SSO, SAML, OAuth2, and LDAP integration with fallback to local auth mechanisms",
            "",
            ""
        ));
        assert!(!is_section_header("Supports SSO", "TBD", ""));
        assert!(is_section_header("Security:", "YES", "filled"));
    }

    #[test]
    fn test_header_length_counts_characters() {
        let accented = "é".repeat(59);
        assert!(is_section_header(&accented, "", ""));
        assert!(!is_section_header(&"é".repeat(60), "", ""));
    }

    #[test]
    fn test_blank_cells() {
        assert!(is_blank_cell(""));
        assert!(is_blank_cell("  nan "));
        assert!(is_blank_cell("NaN"));
        assert!(!is_blank_cell("none"));
    }

    #[test]
    fn test_enriched_query() {
        assert_eq!(enriched_query("", " OAuth2 support ").as_str(), "OAuth2 support");
        assert_eq!(
            enriched_query("Security", "OAuth2 support").as_str(),
            "Security OAuth2 support"
        );
    }

    #[test]
    fn test_report_totals() {
        let report = ComplianceReport {
            sheets: vec![
                SheetSummary {
                    processed: 2,
                    skipped: 1,
                    ..Default::default()
                },
                SheetSummary {
                    processed: 3,
                    errors: 1,
                    ..Default::default()
                },
            ],
        };
        assert_eq!(report.processed(), 5);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.errors(), 1);
    }
}
