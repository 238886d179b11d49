//! Legion - Indentation-aware logging and unhandled failure reporting
//!
//! A process-wide [`Logger`] writes every record to up to four sinks (debug
//! file, log file, stdout, stderr), each with its own severity range and line
//! template. Failures that reach a program boundary are turned into structured
//! error blocks by a [`report::Reporter`].
//!
//! ```no_run
//! use legion::{Logger, LoggerConfig};
//!
//! let logger = legion::logger();
//! logger.configure(&LoggerConfig::console_only().with_log_file("run.log"))?;
//! logger.info("Copying files")?;
//! {
//!     let _indent = logger.indented();
//!     logger.info("a.txt")?;
//! }
//! # Ok::<(), legion::LegionError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod oserror;
pub mod platform;
pub mod program;
pub mod report;

pub use config::{Config, DestinationEntry, LoggerConfig};
pub use error::{LegionError, Result};
pub use logging::{init_tracing, IndentGuard, LegionLayer, Level, Logger};
pub use oserror::{format_oserror, normalize, ErrorDescriptor, OsFailure};
pub use report::{install_panic_hook, Cancelled, Disposition, Failure, Reporter};

use constants::TIMESTAMP_FORMAT;
use once_cell::sync::Lazy;
use std::sync::Arc;

static DEFAULT_LOGGER: Lazy<Arc<Logger>> = Lazy::new(|| Arc::new(Logger::new()));

/// Process-wide default logger
///
/// Writes bare to stderr until configured.
pub fn logger() -> &'static Arc<Logger> {
    &DEFAULT_LOGGER
}

/// Current local time as `YYYYmmdd_HHMMSS`
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
