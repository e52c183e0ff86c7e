//! Command trait and context for dispatching commands

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::Cli;
use claimscore_core::config::Config;
use claimscore_core::error::Result;
use claimscore_core::results::ResultsLog;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub cwd: &'a Path,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, cwd: &'a Path, start: Instant) -> Self {
        Self { cli, cwd, start }
    }

    /// Resolve configuration from `--config`, the local file or the global file
    pub fn load_config(&self) -> Result<Config> {
        let config = Config::resolve(self.cli.config.as_deref(), self.cwd)?;
        tracing::debug!(elapsed = ?self.start.elapsed(), "load_config");
        Ok(config)
    }

    /// Results directory; relative paths resolve against the working directory
    pub fn results_dir(&self, config: &Config) -> PathBuf {
        let dir = Path::new(&config.results.dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.cwd.join(dir)
        }
    }

    pub fn results_log(&self, config: &Config) -> ResultsLog {
        ResultsLog::new(&self.results_dir(config))
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("claimscore {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Claim-based evaluation of retrieval-augmented generation pipelines.");
        println!();
        println!("Run `claimscore --help` for usage information.");
        Ok(())
    }
}
