//! Legion - logging demo and failure reporter
//!
//! Usage:
//!   legion                               Log a short sample to the console
//!   legion --log-file run.log            Also write a timestamped log file
//!   legion --config legion.toml          Take sinks from a [logging] table
//!   legion crash panic|os|error          Fail on purpose and report it

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, CrashKind};
use legion::constants::{ARROW_L, ARROW_R};
use legion::{LoggerConfig, Logger, Reporter};
use std::process::ExitCode;
use std::sync::Arc;

const CRASH_PATH: &str = "legion-crash/does-not-exist.txt";

fn main() -> ExitCode {
    let cli = Cli::parse();
    legion::init_tracing(cli.verbose);

    let logger = Arc::clone(legion::logger());
    legion::install_panic_hook(Reporter::new(Arc::clone(&logger)));

    match run(&cli, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let err: &(dyn std::error::Error + 'static) = e.as_ref();
            Reporter::new(logger).report_error(err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, logger: &Logger) -> Result<()> {
    let base = match &cli.config {
        Some(path) => legion::config::load(path)?.logging,
        None => LoggerConfig::default(),
    };
    logger.configure(&cli.logger_config(base))?;

    legion::info!(logger, "{} {}", logger.program_name(), env!("CARGO_PKG_VERSION"))?;
    {
        let _indent = logger.indented();
        legion::info!(logger, "started {}", legion::timestamp())?;
        legion::debug!(logger, "program path {}", legion::program::path().display())?;
        legion::info!(logger, "arrows {} {}", ARROW_R, ARROW_L)?;
    }

    match cli.command {
        Some(Command::Crash { kind }) => crash(kind, logger),
        None => Ok(()),
    }
}

fn crash(kind: CrashKind, logger: &Logger) -> Result<()> {
    legion::warning!(logger, "crashing on request ({:?})", kind)?;
    match kind {
        CrashKind::Panic => panic!("crash requested"),
        CrashKind::Os => {
            std::fs::File::open(CRASH_PATH)
                .with_context(|| format!("opening {}", CRASH_PATH))?;
            Ok(())
        }
        CrashKind::Error => {
            let value: u32 = "forty-two".parse().context("parsing answer")?;
            legion::info!(logger, "answer {}", value)?;
            Ok(())
        }
    }
}
