use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Ground-truth dataset (.json, .jsonl, .yaml or .yml)
    #[arg(long, short = 'g')]
    pub ground_truth: PathBuf,

    /// Base URL of an HTTP pipeline
    #[arg(long, conflicts_with = "recording")]
    pub endpoint: Option<String>,

    /// Replay answers recorded in a JSON or YAML file
    #[arg(long)]
    pub recording: Option<PathBuf>,

    /// Document to ingest into the pipeline before evaluating
    #[arg(long)]
    pub ingest: Option<PathBuf>,

    /// Judge model name
    #[arg(long)]
    pub judge_model: Option<String>,

    /// Maximum judge calls in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Human-friendly name for this run
    #[arg(long, short)]
    pub label: Option<String>,

    /// Write the report to this file (.yaml/.yml for YAML, JSON otherwise)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Do not append this run to the results log
    #[arg(long)]
    pub no_record: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Run id or unique id prefix
    pub id: String,
}
