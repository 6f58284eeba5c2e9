//! rfpbuddy - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rfpbuddy::{
    agent::AgenticOrchestrator,
    batch::{parse_sections, ComplianceProcessor, ProposalGenerator},
    bootstrap::Bootstrap,
    cli::{Args, Commands, Config, Verbosity},
    types::{Mode, Provider, Query},
    RfpError,
};

/// Exit code after Ctrl-C, matching shell convention
const EXIT_CODE_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(2);
    }

    init_tracing(args.verbosity());

    let config = Config::load(args.config.clone())?;
    let provider = args.provider.unwrap_or(config.model_provider);

    match &args.command {
        Commands::Config => show_config(&config),
        Commands::Ask { question, mode } => run_ask(&config, provider, question, *mode).await,
        Commands::Compliance { input } => run_compliance(&config, provider, input).await,
        Commands::Proposal {
            input,
            start_page,
            end_page,
            no_resume,
        } => {
            run_proposal(&config, provider, input, *start_page, *end_page, !*no_resume).await
        }
    }
}

/// `RUST_LOG` wins over the verbosity flags
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn show_config(config: &Config) -> Result<()> {
    println!("{}", "Current configuration".bold());
    if let Some(path) = Config::default_path() {
        println!("{} {}\n", "Default path:".dimmed(), path.display());
    }
    println!("{}", config.to_toml()?);
    Ok(())
}

async fn build_orchestrator(config: &Config, provider: Provider) -> Result<AgenticOrchestrator> {
    let bootstrap = Bootstrap::new(config.clone(), provider);
    match bootstrap.build().await {
        Ok(orchestrator) => Ok(orchestrator),
        Err(RfpError::MissingCredentials(var)) => {
            eprintln!(
                "{} cloud provider selected but {} is not set.",
                "Error:".red().bold(),
                var.yellow()
            );
            eprintln!("Export {}=<your key> or use --provider local.", var);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_ask(config: &Config, provider: Provider, question: &str, mode: Mode) -> Result<()> {
    let orchestrator = build_orchestrator(config, provider).await?;
    let outcome = orchestrator
        .answer_traced(&Query::new(question), mode, orchestrator.retries())
        .await;

    info!("Answered after {} attempt(s)", outcome.attempt_count());
    if !outcome.is_success() {
        eprintln!("{}", "No grounded answer; showing fallback.".yellow());
    }
    println!("{}", outcome.result.text());
    Ok(())
}

async fn run_compliance(config: &Config, provider: Provider, input: &Path) -> Result<()> {
    let input = resolve_input(config, input)?;
    let stem = file_stem(&input)?;
    let outputs = ensure_outputs_dir(config)?;
    let output = outputs.join(format!("{}_filled.json", stem));
    let summary_output = outputs.join(format!("{}_responses.md", stem));

    let orchestrator = build_orchestrator(config, provider).await?;
    let processor = ComplianceProcessor::new(&orchestrator);
    let report = processor.process_file(&input, &output, &summary_output).await?;

    println!("\n{}", "Compliance processing complete.".green().bold());
    for sheet in &report.sheets {
        if sheet.passed_through {
            println!("  {} {}", sheet.name.bold(), "(copied, no feature column)".dimmed());
            continue;
        }
        println!(
            "  {} Processed: {} | Skipped: {} | Errors: {}",
            sheet.name.bold(),
            sheet.processed.to_string().green(),
            sheet.skipped.to_string().yellow(),
            sheet.errors.to_string().red(),
        );
    }
    println!("{} {}", "Workbook output:".dimmed(), output.display());
    println!("{} {}", "Summary        :".dimmed(), summary_output.display());
    Ok(())
}

async fn run_proposal(
    config: &Config,
    provider: Provider,
    input: &Path,
    start_page: usize,
    end_page: usize,
    resume: bool,
) -> Result<()> {
    let input = resolve_input(config, input)?;
    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read RFP text {}", input.display()))?;

    let sections = parse_sections(&text, start_page, end_page)?;
    if sections.is_empty() {
        eprintln!("{}", "No sections detected in the selected page range.".yellow());
        std::process::exit(1);
    }

    let stem = file_stem(&input)?;
    let output = ensure_outputs_dir(config)?.join(format!("{}_proposal.md", stem));

    let orchestrator = build_orchestrator(config, provider).await?;

    let pb = ProgressBar::new(sections.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let generator = ProposalGenerator::new(&orchestrator)
        .with_resume(resume)
        .with_progress(pb.clone());
    let result = generator.generate(&sections, &output).await;
    pb.finish_and_clear();

    match result {
        Ok(summary) => {
            println!("{}", "Proposal generation complete.".green().bold());
            println!(
                "Completed : {} | Skipped : {} | Fallbacks : {}",
                summary.completed.to_string().green(),
                summary.skipped.to_string().yellow(),
                summary.fallbacks.to_string().red(),
            );
            println!("{} {}", "Output    :".dimmed(), output.display());
            Ok(())
        }
        Err(RfpError::Interrupted { completed }) => {
            eprintln!(
                "\n{} {} new section(s) saved to {}",
                "Interrupted.".yellow().bold(),
                completed,
                output.display()
            );
            std::process::exit(EXIT_CODE_INTERRUPTED);
        }
        Err(e) => Err(e.into()),
    }
}

/// Use the path as given, else look it up under `paths.inputs_dir`
fn resolve_input(config: &Config, input: &Path) -> Result<PathBuf> {
    if input.exists() {
        return Ok(input.to_path_buf());
    }

    let candidate = config.inputs_dir().join(input);
    if candidate.exists() {
        return Ok(candidate);
    }

    anyhow::bail!("Input file not found: {}", input.display())
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .with_context(|| format!("Input path has no file name: {}", path.display()))
}

fn ensure_outputs_dir(config: &Config) -> Result<PathBuf> {
    let outputs = config.outputs_dir();
    std::fs::create_dir_all(&outputs)
        .with_context(|| format!("Failed to create output directory {}", outputs.display()))?;
    Ok(outputs)
}
