//! `claimscore run` - evaluate a pipeline against a ground-truth dataset
//!
//! Builds the judge and pipeline from config and flags, optionally ingests
//! a document, runs the evaluation with Ctrl-C cancellation, then prints,
//! writes and records the report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::cli::{OutputFormat, RunArgs};
use crate::commands::dispatch::CommandContext;
use crate::commands::render::{render_report, write_report_file};
use claimscore_core::cancel::run_cancellable;
use claimscore_core::config::Config;
use claimscore_core::error::{EvalError, Result};
use claimscore_core::ground_truth;
use claimscore_core::judge::openai::OpenAiJudge;
use claimscore_core::judge::JudgeClient;
use claimscore_core::pipeline::http::HttpPipeline;
use claimscore_core::pipeline::recorded::RecordedPipeline;
use claimscore_core::pipeline::RagPipeline;
use claimscore_core::results::RunRecord;
use claimscore_core::Evaluator;

/// Execute the run command
pub fn execute(ctx: &CommandContext, args: &RunArgs) -> Result<()> {
    let config = apply_overrides(ctx.load_config()?, args)?;

    // Malformed ground truth must fail before any judge or pipeline call.
    let dataset = ground_truth::load(&args.ground_truth)?;
    let fingerprint = ground_truth::fingerprint(&dataset);

    let judge = OpenAiJudge::from_config(&config.judge)?;
    let pipeline = build_pipeline(ctx, &config)?;
    let evaluator = Evaluator::new(JudgeClient::new(Arc::new(judge)), &config.evaluation);

    let cancel = evaluator.cancellation().clone();
    ctrlc::set_handler(move || cancel.cancel())
        .map_err(|e| EvalError::Other(format!("failed to install Ctrl-C handler: {}", e)))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let started_at = Utc::now();
    let report = runtime.block_on(async {
        if let Some(path) = &args.ingest {
            run_cancellable(evaluator.cancellation(), pipeline.load(path)).await?;
        }
        evaluator.run(pipeline.as_ref(), &dataset).await
    })?;
    tracing::debug!(elapsed = ?ctx.start.elapsed(), "evaluation");

    let record = RunRecord::new(
        args.label.clone(),
        started_at,
        args.ground_truth.clone(),
        fingerprint,
        config.judge.model.clone(),
        report,
    );

    println!("{}", render_report(&record.report, ctx.cli.format)?.trim_end());

    if let Some(path) = report_path(ctx, &config, args, &record.id) {
        write_report_file(&path, &record.report)?;
        status(ctx, &format!("Report written to {}", path.display()));
    }

    if config.results.record {
        let log = ctx.results_log(&config);
        log.append(&record)?;
        status(ctx, &format!("Recorded run {} in {}", record.id, log.path().display()));
    }

    Ok(())
}

/// Flags win over file configuration
fn apply_overrides(mut config: Config, args: &RunArgs) -> Result<Config> {
    if let Some(model) = &args.judge_model {
        config.judge.model = model.clone();
    }
    if let Some(concurrency) = args.concurrency {
        config.evaluation.concurrency = concurrency;
    }
    if let Some(endpoint) = &args.endpoint {
        config.pipeline.endpoint = Some(endpoint.clone());
        config.pipeline.recording = None;
    }
    if let Some(recording) = &args.recording {
        config.pipeline.recording = Some(recording.display().to_string());
    }
    if args.no_record {
        config.results.record = false;
    }
    config.validate()?;
    Ok(config)
}

/// A recording takes precedence over an endpoint
fn build_pipeline(ctx: &CommandContext, config: &Config) -> Result<Box<dyn RagPipeline>> {
    if let Some(recording) = &config.pipeline.recording {
        let path = ctx.cwd.join(recording);
        return Ok(Box::new(RecordedPipeline::open(&path)?));
    }
    if let Some(endpoint) = &config.pipeline.endpoint {
        let timeout = Duration::from_secs(config.pipeline.timeout_secs);
        return Ok(Box::new(HttpPipeline::new(endpoint.as_str(), timeout)?));
    }
    Err(EvalError::UsageError(
        "no pipeline configured: pass --endpoint or --recording, or set [pipeline] in claimscore.toml"
            .to_string(),
    ))
}

/// `--output`, or `<results dir>/<slug(label)>-<run id>.json` for labelled runs
fn report_path(
    ctx: &CommandContext,
    config: &Config,
    args: &RunArgs,
    run_id: &str,
) -> Option<PathBuf> {
    if let Some(output) = &args.output {
        return Some(output.clone());
    }
    let label = args.label.as_deref()?;
    Some(ctx.results_dir(config).join(labelled_file_name(label, run_id)))
}

fn labelled_file_name(label: &str, run_id: &str) -> String {
    let slug = slug::slugify(label);
    if slug.is_empty() {
        format!("{}.json", run_id)
    } else {
        format!("{}-{}.json", slug, run_id)
    }
}

/// Progress messages go to stderr so stdout stays a clean report
fn status(ctx: &CommandContext, message: &str) {
    if !ctx.cli.quiet && ctx.cli.format == OutputFormat::Human {
        eprintln!("{}", message);
    }
}
