//! Command-line surface of the toolkit.
//!
//! The `codwoe` binary only parses arguments and sets up logging; every
//! subcommand is dispatched from here so the parsing rules can be tested
//! without spawning a process.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;

use crate::errors::ValidationError;
use crate::registry::Registry;
use crate::stats::DatasetStats;
use crate::validator::{Finding, SubmissionValidator, ValidationObserver, ValidationSummary};

#[derive(Parser, Debug)]
#[command(
    name = "codwoe",
    version,
    about = "Check submission files and inspect datasets for the definition modeling and reverse dictionary tracks"
)]
pub struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the format of one or more submission files
    CheckFormat(CheckArgs),

    /// Print statistics about a dataset file
    Stats(StatsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Submission files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// JSON file overriding the accepted tracks, languages and architectures
    #[arg(long)]
    pub registry: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Check every file even after one fails
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Dataset file (JSON array of items)
    pub file: PathBuf,

    #[arg(long)]
    pub registry: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Outcome of a `check-format` run.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub passed: Vec<ValidationSummary>,
    pub failed: Vec<ValidationError>,
}

impl CheckReport {
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Forwards validator findings to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ValidationObserver for TracingObserver {
    fn observe(&mut self, finding: &Finding) {
        tracing::info!("{}", finding);
    }
}

impl Cli {
    /// Log filter forced by `--verbose` or `--quiet`, if either was given
    pub fn log_directive(&self) -> Option<&'static str> {
        if self.verbose {
            Some("codwoe=debug")
        } else if self.quiet {
            Some("codwoe=warn")
        } else {
            None
        }
    }

    pub fn run(self) -> Result<ExitCode> {
        match self.command {
            Commands::CheckFormat(args) => {
                let report = run_check(&args)?;
                if report.success() {
                    Ok(ExitCode::SUCCESS)
                } else {
                    Ok(ExitCode::FAILURE)
                }
            }
            Commands::Stats(args) => {
                run_stats(&args)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn load_registry(path: Option<&Path>) -> Result<Registry> {
    match path {
        Some(path) => {
            tracing::debug!("Loading registry from {}", path.display());
            Ok(Registry::load(path)?)
        }
        None => Ok(Registry::default()),
    }
}

/// Validate every file named in `args`, printing one verdict per file.
pub fn run_check(args: &CheckArgs) -> Result<CheckReport> {
    let registry = load_registry(args.registry.as_deref())?;
    let validator = SubmissionValidator::new(&registry);
    let mut report = CheckReport::default();

    for path in &args.files {
        tracing::info!("Checking the format of the submission file {}", path.display());
        match validator.validate_file(path, &mut TracingObserver) {
            Ok(summary) => {
                match args.format {
                    OutputFormat::Text => println!("{}", summary),
                    OutputFormat::Json => {
                        println!("{}", json!({"status": "ok", "summary": summary}))
                    }
                }
                report.passed.push(summary);
            }
            Err(err) => {
                tracing::warn!(kind = ?err.kind(), "submission rejected");
                match args.format {
                    OutputFormat::Text => eprintln!("{}", err),
                    OutputFormat::Json => println!(
                        "{}",
                        json!({
                            "status": "failed",
                            "file": err.file(),
                            "kind": format!("{:?}", err.kind()),
                            "message": err.to_string(),
                        })
                    ),
                }
                report.failed.push(err);
                if !args.keep_going {
                    break;
                }
            }
        }
    }

    tracing::info!(
        "Verification completed: {} passed, {} failed",
        report.passed.len(),
        report.failed.len()
    );
    Ok(report)
}

pub fn run_stats(args: &StatsArgs) -> Result<DatasetStats> {
    let registry = load_registry(args.registry.as_deref())?;
    tracing::info!("Loading dataset {}", args.file.display());
    let stats = DatasetStats::from_file(&args.file, &registry)?;
    match args.format {
        OutputFormat::Text => println!("{}", stats),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(stats)
}
