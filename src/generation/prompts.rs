//! Prompt templates

use crate::types::{Mode, Query};

/// System prompt for compliance-sheet rows
pub const COMPLIANCE_SYSTEM_PROMPT: &str = r#"You are a senior enterprise presales consultant responding to an RFP compliance sheet.

First line must be exactly one of:
YES
NO
PARTIAL

Then provide 4-6 lines of technical justification.
No fluff. No marketing language."#;

/// System prompt for proposal sections and general answers
pub const PROPOSAL_SYSTEM_PROMPT: &str = r#"You are an enterprise presales architect preparing a formal RFP response.

REQUIREMENTS:
- 2-4 structured paragraphs.
- Cover all listed requirements explicitly.
- Professional enterprise tone.
- No placeholders.
- No one-line answers.
- No marketing exaggeration."#;

pub fn system_prompt(mode: Mode) -> &'static str {
    if mode.is_compliance() {
        COMPLIANCE_SYSTEM_PROMPT
    } else {
        PROPOSAL_SYSTEM_PROMPT
    }
}

/// Full completion prompt: system prompt, retrieved context, requirement
pub fn build_prompt(context: &str, query: &Query, mode: Mode) -> String {
    format!(
        "{}\n\nContext:\n{}\n\nRequirement:\n{}\n",
        system_prompt(mode),
        context,
        query
    )
}
