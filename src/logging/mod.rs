//! Indentation-aware logging
//!
//! Centralizes all log-related types and utilities:
//! - `LogRecord` / `Level` - Individual logging calls
//! - `Template` - Per-destination multiline formatting
//! - `Sink` / `Router` - Severity-filtered fan-out to files and console
//! - `Logger` - Façade owning the indent state and the sink set
//! - `LegionLayer` - Bridge from `tracing` events into a `Logger`

pub mod entry;
pub mod format;
pub mod indent;
pub mod layer;
pub mod logger;
mod macros;
pub mod router;
pub mod sink;

pub use entry::{Level, LogRecord};
pub use format::Template;
pub use indent::IndentState;
pub use layer::LegionLayer;
pub use logger::{IndentGuard, Logger};
pub use router::Router;
pub use sink::{ConsoleStreams, DestinationConfig, SharedBuffer, Sink, Target};

/// Initialize internal tracing for legion's own diagnostics
///
/// Call early in main() before any logging occurs.
/// Set `verbose` to true for debug-level output. Output goes to stderr.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { "debug" } else { "warn" };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(false)
                .compact(),
        )
        .with(tracing_subscriber::EnvFilter::new(level))
        .try_init();
}
