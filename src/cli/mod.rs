//! CLI argument parsing for claimscore
//!
//! Global flags: --config, --format, --quiet, --verbose, --log-level, --log-json

pub mod args;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{RunArgs, ShowArgs};
pub use output::OutputFormat;

/// Claimscore - claim-based evaluation of RAG pipelines
#[derive(Parser, Debug)]
#[command(name = "claimscore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: ./claimscore.toml, then the global config)
    #[arg(long, global = true, env = "CLAIMSCORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter (e.g. `info`, or a full directive like `claimscore_core=trace`)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a pipeline against a ground-truth dataset
    Run(RunArgs),

    /// List recorded runs
    History,

    /// Print a recorded run's report
    Show(ShowArgs),
}
