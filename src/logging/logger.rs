//! Indented logger
//!
//! The façade the rest of a program talks to. A `Logger` owns its indent state
//! and its sink set; both sit behind one mutex, so every call (including a
//! whole error block) is applied atomically and in order.

use super::{
    ConsoleStreams, DestinationConfig, IndentState, Level, LogRecord, Router, Target, Template,
};
use crate::config::LoggerConfig;
use crate::constants::{BARE_TEMPLATE, ERROR_MARKER};
use crate::error::Result;
use crate::program;
use parking_lot::Mutex;
use std::fmt::Display;
use std::panic::Location;
use std::time::Duration;

const ERROR_DETAILS_HEADING: &str = "\nAdditional error information:";
const ERROR_DETAILS_PREAMBLE: &str = "│ ";
const ERROR_DETAILS_TAIL: &str = "╰";

pub struct Logger {
    inner: Mutex<Inner>,
    console: ConsoleStreams,
    program_name: String,
}

struct Inner {
    indent: IndentState,
    router: Router,
}

impl Inner {
    fn emit(&mut self, level: Level, source: &str, message: &str) -> Result<()> {
        let record = LogRecord::new(level, source, message);
        self.router.route(&record, self.indent.prefix())?;
        Ok(())
    }

    fn error_block(
        &mut self,
        program: &str,
        source: &str,
        message: &str,
        details: &str,
    ) -> Result<()> {
        self.indent.set(0usize)?;
        let result = self.emit_error_block(program, source, message, details);
        self.indent.set(0usize)?;
        result
    }

    fn emit_error_block(
        &mut self,
        program: &str,
        source: &str,
        message: &str,
        details: &str,
    ) -> Result<()> {
        let header = format!("\n{}Error in {}.", ERROR_MARKER, program);
        self.emit(Level::Error, source, &header)?;

        self.indent.set(ERROR_MARKER.chars().count())?;
        self.emit(Level::Error, source, message)?;

        // Leading spaces are kept so aligned blocks stay aligned.
        let details = details.trim_end().trim_start_matches(['\n', '\r']);
        if !details.trim().is_empty() {
            let framed = details
                .split('\n')
                .map(|line| format!("{}{}", ERROR_DETAILS_PREAMBLE, line))
                .collect::<Vec<_>>()
                .join("\n");
            self.emit(Level::Error, source, ERROR_DETAILS_HEADING)?;
            self.emit(Level::Error, source, &framed)?;
            self.emit(Level::Error, source, ERROR_DETAILS_TAIL)?;
        }
        Ok(())
    }
}

impl Logger {
    /// Logger writing to the process console streams
    ///
    /// Until `configure` is called, every record goes bare to stderr.
    pub fn new() -> Self {
        Self::with_console(ConsoleStreams::Standard)
    }

    /// Logger whose console sinks write to `console`
    pub fn with_console(console: ConsoleStreams) -> Self {
        let router = Router::open(fallback_destinations(), &console).unwrap_or_default();
        Self {
            inner: Mutex::new(Inner {
                indent: IndentState::default(),
                router,
            }),
            console,
            program_name: program::name(),
        }
    }

    /// Override the program name used in error block headers
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    // === Configuration ===

    /// Replace the whole sink set
    ///
    /// Files are truncated now. If any destination fails to open, the previous
    /// sink set stays active and the error is returned.
    pub fn configure(&self, config: &LoggerConfig) -> Result<()> {
        self.install(config.destinations()?, Some(config.indent_unit))
    }

    /// Replace the whole sink set with prepared destinations
    ///
    /// Same rules as `configure`; the indent unit is kept.
    pub fn configure_destinations(&self, destinations: Vec<DestinationConfig>) -> Result<()> {
        self.install(destinations, None)
    }

    fn install(&self, destinations: Vec<DestinationConfig>, unit: Option<char>) -> Result<()> {
        let router = Router::open(destinations, &self.console)?;
        let count = router.len();
        {
            let mut inner = self.inner.lock();
            inner.router = router;
            if let Some(unit) = unit {
                inner.indent.set_unit(unit);
            }
        }
        tracing::debug!(sinks = count, "logger reconfigured");
        Ok(())
    }

    /// Number of active sinks
    pub fn sink_count(&self) -> usize {
        self.inner.lock().router.len()
    }

    /// Targets of the active sinks, in write order
    pub fn targets(&self) -> Vec<Target> {
        self.inner
            .lock()
            .router
            .sinks()
            .map(|d| d.target.clone())
            .collect()
    }

    // === Logging ===

    /// Log `message`, recording the caller location as source
    #[track_caller]
    pub fn log(&self, level: Level, message: impl AsRef<str>) -> Result<()> {
        let caller = caller_source(Location::caller());
        self.log_from(level, &caller, message)
    }

    /// Log `message` with an explicit source (used by the macros)
    pub fn log_from(&self, level: Level, source: &str, message: impl AsRef<str>) -> Result<()> {
        self.inner.lock().emit(level, source, message.as_ref())
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Level::Debug, message)
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Level::Info, message)
    }

    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Level::Warning, message)
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Level::Error, message)
    }

    #[track_caller]
    pub fn critical(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Level::Critical, message)
    }

    // === Indentation ===

    pub fn indent(&self) {
        self.inner.lock().indent.increase();
    }

    /// Decrement the indent level; stays at zero
    pub fn dedent(&self) {
        self.inner.lock().indent.decrease();
    }

    /// Set an absolute indent level; negative or too deep levels are rejected
    pub fn set_indent<L>(&self, level: L) -> Result<()>
    where
        L: TryInto<usize> + Display + Copy,
    {
        self.inner.lock().indent.set(level)
    }

    pub fn indent_level(&self) -> usize {
        self.inner.lock().indent.level()
    }

    /// Indent now, dedent when the guard drops
    pub fn indented(&self) -> IndentGuard<'_> {
        self.indent();
        IndentGuard { logger: self }
    }

    // === Error blocks ===

    /// Log an error message with optional details as one block
    ///
    /// ```text
    ///
    /// *** Error in <program>.
    ///     <message>
    ///
    ///     Additional error information:
    ///     │ <details line>
    ///     ╰
    /// ```
    ///
    /// Indentation is reset to zero before and after the block.
    #[track_caller]
    pub fn error_block(&self, message: impl AsRef<str>, details: impl AsRef<str>) -> Result<()> {
        let source = caller_source(Location::caller());
        let mut inner = self.inner.lock();
        inner.error_block(&self.program_name, &source, message.as_ref(), details.as_ref())
    }

    /// `error_block` that gives up if the logger stays locked for `timeout`
    ///
    /// Used from panic hooks, which may run while the panicking thread itself
    /// holds the lock. Returns `None` on timeout.
    pub(crate) fn try_error_block(
        &self,
        timeout: Duration,
        message: &str,
        details: &str,
    ) -> Option<Result<()>> {
        let mut inner = self.inner.try_lock_for(timeout)?;
        Some(inner.error_block(&self.program_name, "report", message, details))
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("program_name", &self.program_name)
            .field("indent_level", &self.indent_level())
            .field("sinks", &self.sink_count())
            .finish()
    }
}

/// Dedents its logger on drop
#[must_use = "the indentation is undone as soon as the guard is dropped"]
pub struct IndentGuard<'a> {
    logger: &'a Logger,
}

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        self.logger.dedent();
    }
}

/// Single bare stderr sink used before the first `configure`
fn fallback_destinations() -> Vec<DestinationConfig> {
    match Template::parse(BARE_TEMPLATE) {
        Ok(template) => vec![DestinationConfig {
            name: "stderr",
            target: Target::Stderr,
            min_level: Level::Debug,
            max_level: Level::Critical,
            template,
        }],
        Err(_) => Vec::new(),
    }
}

fn caller_source(location: &Location<'_>) -> String {
    format!("{}:{}", location.file(), location.line())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LegionError;
    use crate::logging::SharedBuffer;

    fn console_logger() -> (Logger, SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let logger = Logger::with_console(ConsoleStreams::memory(out.clone(), err.clone()))
            .with_program_name("tool");
        logger.configure(&LoggerConfig::console_only()).unwrap();
        (logger, out, err)
    }

    #[test]
    fn test_unconfigured_logger_writes_everything_to_stderr() {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let logger = Logger::with_console(ConsoleStreams::memory(out.clone(), err.clone()));

        logger.debug("early").unwrap();
        logger.info("also early").unwrap();

        assert!(out.lines().is_empty());
        assert_eq!(err.lines(), vec!["early", "also early"]);
        assert_eq!(logger.sink_count(), 1);
    }

    #[test]
    fn test_multiline_at_indent_two() {
        let (logger, out, _) = console_logger();
        logger.set_indent(2).unwrap();
        logger.info("a\nb\nc").unwrap();
        assert_eq!(out.lines(), vec!["  a", "  b", "  c"]);
    }

    #[test]
    fn test_blank_message_ignores_indent() {
        let (logger, out, _) = console_logger();
        logger.set_indent(5).unwrap();
        logger.info("").unwrap();
        logger.info("   ").unwrap();
        assert_eq!(out.contents(), "\n\n");
    }

    #[test]
    fn test_dedent_never_negative() {
        let (logger, _, _) = console_logger();
        logger.dedent();
        logger.dedent();
        logger.indent();
        assert_eq!(logger.indent_level(), 1);
    }

    #[test]
    fn test_set_indent_negative() {
        let (logger, _, _) = console_logger();
        let err = logger.set_indent(-1).unwrap_err();
        assert!(matches!(err, LegionError::BadIndentLevel { .. }));
        assert_eq!(logger.indent_level(), 0);
    }

    #[test]
    fn test_set_indent_huge_is_an_error() {
        let (logger, _, _) = console_logger();
        let err = logger.set_indent(usize::MAX).unwrap_err();
        assert!(matches!(err, LegionError::BadIndentLevel { .. }));
        assert_eq!(logger.indent_level(), 0);
    }

    #[test]
    fn test_indent_guard() {
        let (logger, out, _) = console_logger();
        logger.info("outer").unwrap();
        {
            let _guard = logger.indented();
            logger.info("inner").unwrap();
        }
        logger.info("outer again").unwrap();
        assert_eq!(out.lines(), vec!["outer", " inner", "outer again"]);
    }

    #[test]
    fn test_configure_idempotent() {
        let (logger, _, _) = console_logger();
        let once = logger.sink_count();
        logger.configure(&LoggerConfig::console_only()).unwrap();
        assert_eq!(logger.sink_count(), once);
        assert_eq!(logger.targets(), vec![Target::Stdout, Target::Stderr]);
    }

    #[test]
    fn test_configure_failure_keeps_previous_sinks() {
        let (logger, out, _) = console_logger();
        let bad = LoggerConfig::default().with_debug_file("/nonexistent/dir/debug.log");

        let err = logger.configure(&bad).unwrap_err();
        assert!(matches!(err, LegionError::SinkOpen { .. }));
        assert_eq!(logger.sink_count(), 2);

        logger.info("still here").unwrap();
        assert_eq!(out.lines(), vec!["still here"]);
    }

    #[test]
    fn test_configure_destinations_custom_template() {
        let (logger, out, err) = console_logger();
        logger
            .configure_destinations(vec![DestinationConfig {
                name: "tagged",
                target: Target::Stdout,
                min_level: Level::Debug,
                max_level: Level::Warning,
                template: Template::parse("<{level}> {message} <").unwrap(),
            }])
            .unwrap();
        logger.set_indent(1).unwrap();

        logger.debug("a\nb").unwrap();
        logger.error("not routed").unwrap();

        assert_eq!(logger.targets(), vec![Target::Stdout]);
        assert_eq!(out.lines(), vec!["<DEBUG   >  a <", "<DEBUG   >  b <"]);
        assert!(err.lines().is_empty());
    }

    #[test]
    fn test_configure_bad_template_keeps_previous_sinks() {
        let (logger, _, err) = console_logger();
        let config = LoggerConfig::console_only().with_destination(
            crate::config::DestinationEntry::new(Target::Stderr).with_template("{nope} {message}"),
        );

        let failure = logger.configure(&config).unwrap_err();
        assert!(matches!(failure, LegionError::Template { .. }));
        assert_eq!(logger.sink_count(), 2);

        logger.warning("still here").unwrap();
        assert_eq!(err.lines(), vec!["still here"]);
    }

    #[test]
    fn test_configure_indent_unit() {
        let (logger, out, _) = console_logger();
        let config = LoggerConfig {
            indent_unit: '.',
            ..LoggerConfig::console_only()
        };
        logger.configure(&config).unwrap();
        logger.set_indent(3).unwrap();
        logger.info("x").unwrap();
        assert_eq!(out.lines(), vec!["...x"]);
    }

    #[test]
    fn test_error_block_layout() {
        let (logger, out, err) = console_logger();
        logger.set_indent(7).unwrap();

        logger
            .error_block("Something failed.", "first\nsecond")
            .unwrap();

        assert!(out.lines().is_empty());
        assert_eq!(
            err.lines(),
            vec![
                "",
                "*** Error in tool.",
                "    Something failed.",
                "",
                "    Additional error information:",
                "    │ first",
                "    │ second",
                "    ╰",
            ]
        );
        assert_eq!(logger.indent_level(), 0);
    }

    #[test]
    fn test_error_block_without_details() {
        let (logger, _, err) = console_logger();
        logger.error_block("Oops.", "   ").unwrap();
        assert_eq!(err.lines(), vec!["", "*** Error in tool.", "    Oops."]);
    }

    #[test]
    fn test_error_block_keeps_detail_alignment() {
        let (logger, _, err) = console_logger();
        logger
            .error_block("Bad file.", "\n    type = Io\n   errno = ENOENT\n\n")
            .unwrap();
        let lines = err.lines();
        assert!(lines.contains(&"    │     type = Io".to_string()));
        assert!(lines.contains(&"    │    errno = ENOENT".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("    ╰"));
    }

    #[test]
    fn test_try_error_block_times_out_while_locked() {
        let (logger, _, err) = console_logger();
        let held = logger.inner.lock();
        assert!(logger
            .try_error_block(Duration::from_millis(10), "Oops.", "")
            .is_none());
        drop(held);

        assert!(matches!(
            logger.try_error_block(Duration::from_millis(10), "Oops.", ""),
            Some(Ok(()))
        ));
        assert_eq!(err.lines(), vec!["", "*** Error in tool.", "    Oops."]);
    }
}
