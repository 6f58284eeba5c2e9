//! Batch consumers
//!
//! Compliance workbooks are filled row by row; RFP text is split into
//! sections and answered into a resumable proposal document.

pub mod sheet;
pub mod document;
pub mod sections;
pub mod compliance;
pub mod proposal;

// Re-export commonly used types
pub use sheet::{Workbook, Worksheet};
pub use document::{Block, ResponseDocument};
pub use sections::{parse_sections, Section, SectionParser};
pub use compliance::{
    is_section_header, ComplianceProcessor, ComplianceReport, SheetSummary, COMPLIANCE_COLUMN,
    FEATURE_COLUMN, REMARKS_COLUMN,
};
pub use proposal::{section_query, ProposalGenerator, ProposalSummary};
