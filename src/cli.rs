//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use clap::{Parser, Subcommand, ValueEnum};
use legion::LoggerConfig;
use std::path::PathBuf;

// =============================================================================
// CLI Definition
// =============================================================================

/// Indentation-aware logging demo and failure reporter
#[derive(Parser, Debug, Default)]
#[command(name = "legion")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output of legion itself
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML file with a [logging] table
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Debug log file (every record, with level and source)
    #[arg(long, value_name = "FILE")]
    pub debug_file: Option<PathBuf>,

    /// Log file (INFO and above, timestamped)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Don't write to stdout/stderr
    #[arg(long)]
    pub no_console: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fail on purpose to show the failure report
    Crash {
        #[arg(value_enum)]
        kind: CrashKind,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashKind {
    /// Panic with a message
    Panic,
    /// Return an OS error from main
    Os,
    /// Return a generic error from main
    Error,
}

impl Cli {
    /// Logger config from the command line, on top of `base`
    ///
    /// Paths given on the command line replace those of `base`.
    pub fn logger_config(&self, base: LoggerConfig) -> LoggerConfig {
        let mut config = base;
        if let Some(path) = &self.debug_file {
            config.debug_file = Some(path.clone());
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        if self.no_console {
            config.console = false;
        }
        config
    }
}

// =============================================================================
// Tests
// =============================================================================
