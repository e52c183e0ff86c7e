//! `claimscore history` - list recorded runs

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use claimscore_core::error::Result;
use claimscore_core::results::RunRecord;

/// Execute the history command
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let config = ctx.load_config()?;
    let records = ctx.results_log(&config).load_all()?;

    match ctx.cli.format {
        OutputFormat::Json => {
            let summaries: Vec<_> = records.iter().map(summary).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        OutputFormat::Yaml => {
            let summaries: Vec<_> = records.iter().map(summary).collect();
            print!("{}", serde_yaml::to_string(&summaries)?);
        }
        OutputFormat::Human => {
            if records.is_empty() {
                if !ctx.cli.quiet {
                    println!("No recorded runs");
                }
                return Ok(());
            }
            for record in &records {
                println!("{}", human_line(record));
            }
        }
    }

    Ok(())
}

fn summary(record: &RunRecord) -> serde_json::Value {
    serde_json::json!({
        "id": record.id,
        "label": record.label,
        "started_at": record.started_at,
        "finished_at": record.finished_at,
        "ground_truth": record.ground_truth.display().to_string(),
        "judge_model": record.judge_model,
        "questions": record.report.question_reports.len(),
        "f1_score": record.report.average_overall_claim_report.f1_score,
    })
}

fn human_line(record: &RunRecord) -> String {
    format!(
        "{}  {}  {:>3} questions  f1={:.3}  {}",
        record.id,
        record.finished_at.format("%Y-%m-%d %H:%M"),
        record.report.question_reports.len(),
        record.report.average_overall_claim_report.f1_score,
        record.label.as_deref().unwrap_or("-")
    )
}
