//! Proposal section generator
//!
//! Answers each parsed RFP section in proposal mode and appends it to a
//! Markdown document that is saved after every section. With resume on, an
//! existing document is reloaded and sections that already have a body are
//! skipped.

use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;
use tracing::{info, warn};

use crate::agent::AgenticOrchestrator;
use crate::batch::document::{heading_text, ResponseDocument};
use crate::batch::sections::Section;
use crate::errors::{RfpError, Result};
use crate::types::{Mode, Query};

const SECTION_INSTRUCTION: &str =
    "Respond to the following section requirements in a structured enterprise manner.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSummary {
    pub completed: usize,
    pub skipped: usize,
    /// Sections written with the fallback text
    pub fallbacks: usize,
}

/// Query for a section, or `None` when it has no requirement lines
pub fn section_query(section: &Section) -> Option<Query> {
    let requirements = section
        .requirements()
        .map(|line| format!("- {}", line))
        .collect::<Vec<_>>();

    if requirements.is_empty() {
        return None;
    }

    Some(Query::new(format!(
        "{}\n\nSection:\n{}\n\nRequirements:\n{}",
        SECTION_INSTRUCTION,
        section.heading.trim(),
        requirements.join("\n")
    )))
}

pub struct ProposalGenerator<'a> {
    orchestrator: &'a AgenticOrchestrator,
    resume: bool,
    progress: Option<ProgressBar>,
}

impl<'a> ProposalGenerator<'a> {
    pub fn new(orchestrator: &'a AgenticOrchestrator) -> Self {
        Self {
            orchestrator,
            resume: true,
            progress: None,
        }
    }

    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Generate until done or Ctrl-C
    pub async fn generate(&self, sections: &[Section], output: &Path) -> Result<ProposalSummary> {
        self.generate_until(sections, output, ctrl_c()).await
    }

    /// Generate until done or `interrupt` resolves.
    ///
    /// On interruption the sections finished so far are saved and
    /// `RfpError::Interrupted` is returned.
    pub async fn generate_until<F>(
        &self,
        sections: &[Section],
        output: &Path,
        interrupt: F,
    ) -> Result<ProposalSummary>
    where
        F: Future<Output = ()>,
    {
        let mut doc = self.open_document(output)?;
        let done = doc.completed_headings();
        if !done.is_empty() {
            info!("Found {} completed sections to skip.", done.len());
        }

        let total = sections.len();
        let mut summary = ProposalSummary::default();
        tokio::pin!(interrupt);

        for (idx, section) in sections.iter().enumerate() {
            let heading = heading_text(&section.heading);
            info!("[{}/{}] Section: {}", idx + 1, total, heading);
            if let Some(bar) = &self.progress {
                bar.set_message(heading.clone());
            }

            if done.contains(&heading) {
                info!("Already completed. Skipping.");
                summary.skipped += 1;
                self.tick();
                continue;
            }

            let Some(query) = section_query(section) else {
                info!("No bullet content found. Skipping.");
                summary.skipped += 1;
                self.tick();
                continue;
            };

            let result = tokio::select! {
                biased;
                _ = &mut interrupt => {
                    warn!("Interrupted by user. Saving progress...");
                    doc.save(output)?;
                    info!("Progress saved to: {}", output.display());
                    return Err(RfpError::Interrupted { completed: summary.completed });
                }
                result = self.orchestrator.answer(&query, Mode::Proposal) => result,
            };

            if !result.is_answer() {
                summary.fallbacks += 1;
            }

            doc.add_heading(&heading, 1);
            doc.add_paragraph(result.text());
            doc.save(output)?;
            summary.completed += 1;
            info!("Section saved.");
            self.tick();
        }

        info!(
            "Proposal generation complete. Completed: {} | Skipped: {} | Fallbacks: {}",
            summary.completed, summary.skipped, summary.fallbacks
        );
        Ok(summary)
    }

    fn open_document(&self, output: &Path) -> Result<ResponseDocument> {
        if self.resume && output.exists() {
            info!("Resuming existing document {}", output.display());
            ResponseDocument::load(output)
        } else {
            Ok(ResponseDocument::new())
        }
    }

    fn tick(&self) {
        if let Some(bar) = &self.progress {
            bar.inc(1);
        }
    }
}

/// Resolves on Ctrl-C; never resolves if the signal cannot be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}
