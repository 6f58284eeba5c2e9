//! Command-line argument parsing for rfpbuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::{Mode, Provider};

/// rfpbuddy - Answer RFP compliance sheets and proposals from your knowledge base
#[derive(Parser, Debug)]
#[command(name = "rfpbuddy")]
#[command(version)]
#[command(about = "Retrieval-grounded RFP responses with a local or cloud model", long_about = None)]
pub struct Args {
    /// Completion provider (local/ollama or cloud/gemini); defaults to config
    #[arg(short, long, global = true)]
    pub provider: Option<Provider>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (warnings and final result only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill a compliance workbook (JSON)
    Compliance {
        /// Workbook file
        #[arg(value_name = "WORKBOOK")]
        input: PathBuf,
    },

    /// Draft a proposal from an RFP text export
    Proposal {
        /// RFP text file, pages separated by form feeds
        #[arg(value_name = "RFP")]
        input: PathBuf,

        /// First page (1-based)
        #[arg(long, default_value_t = 1)]
        start_page: usize,

        /// Last page (inclusive, clamped to the document)
        #[arg(long)]
        end_page: usize,

        /// Start a fresh document instead of resuming
        #[arg(long)]
        no_resume: bool,
    },

    /// Answer a single question
    Ask {
        question: String,

        #[arg(short, long, default_value = "answer")]
        mode: Mode,
    },

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Verbosity {
    /// Default tracing filter directive
    pub fn filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
            Verbosity::VeryVerbose => "trace",
        }
    }
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Check argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if let Commands::Proposal { start_page, end_page, .. } = &self.command {
            if *start_page < 1 {
                return Err("Start page must be at least 1.".to_string());
            }
            if end_page < start_page {
                return Err("End page must be greater than or equal to start page.".to_string());
            }
        }

        if let Commands::Ask { question, .. } = &self.command {
            if question.trim().is_empty() {
                return Err("Question must not be empty.".to_string());
            }
        }

        if self.quiet && self.verbose > 0 {
            return Err("Cannot use --quiet with --verbose.".to_string());
        }

        Ok(())
    }
}
