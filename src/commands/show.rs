//! `claimscore show` - print a recorded run's report

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use crate::commands::render::render_report;
use claimscore_core::error::Result;

/// Execute the show command
pub fn execute(ctx: &CommandContext, id: &str) -> Result<()> {
    let config = ctx.load_config()?;
    let record = ctx.results_log(&config).find(id)?;

    if ctx.cli.format == OutputFormat::Human && !ctx.cli.quiet {
        println!(
            "Run {}{} ({} judge, {})",
            record.id,
            record
                .label
                .as_deref()
                .map(|l| format!(" \"{}\"", l))
                .unwrap_or_default(),
            record.judge_model,
            record.finished_at.format("%Y-%m-%d %H:%M")
        );
        println!();
    }

    println!("{}", render_report(&record.report, ctx.cli.format)?.trim_end());
    Ok(())
}
