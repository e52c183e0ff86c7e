//! Command dispatch logic for claimscore

use std::time::Instant;

use crate::cli::{Cli, Commands};
use claimscore_core::error::Result;
use tracing::debug;

mod command;

pub use command::CommandContext;
use command::{Command, NoCommand};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let cwd = std::env::current_dir()?;

    debug!(elapsed = ?start.elapsed(), "resolve_cwd");

    let ctx = CommandContext::new(cli, &cwd, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Run(args) => crate::commands::run::execute(ctx, args),
            Commands::History => crate::commands::history::execute(ctx),
            Commands::Show(args) => crate::commands::show::execute(ctx, &args.id),
        }
    }
}
