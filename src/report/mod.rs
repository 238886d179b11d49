//! Unhandled failure reporting
//!
//! Turns failures that reached a program boundary into a diagnostic report,
//! logs it as an error block and shows a short native alert.
//!
//! Boundaries:
//! - panics, through [`install_panic_hook`]
//! - errors returned from `main`, through [`Reporter::report_error`]

mod hook;
pub mod traceback;

pub use hook::install_panic_hook;
pub use traceback::{FileFrames, Frame};

use crate::constants::NOT_AVAILABLE;
use crate::logging::Logger;
use crate::oserror::{normalize, OsFailure};
use crate::platform::{self, AlertPresenter};
use std::error::Error;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

const OS_HEADLINE: &str = "Unexpected OSError.";
const GENERIC_HEADLINE: &str = "Unhandled exception.";

/// How long a reporter waits for a logger held by someone else
const LOGGER_WAIT: Duration = Duration::from_millis(500);

// =============================================================================
// Failures
// =============================================================================

/// Marker for deliberate interruption
///
/// Panicking with this payload (`std::panic::panic_any(Cancelled)`) is passed
/// through to the previous panic hook without a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cancelled")
    }
}

impl Error for Cancelled {}

/// A failure that reached a program boundary
#[derive(Debug, Clone)]
pub enum Failure {
    Cancellation,
    Os(OsFailure),
    Generic(GenericFailure),
}

/// Positional argument of a generic failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub type_name: String,
    pub value: String,
}

impl Arg {
    pub fn new(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
        }
    }
}

/// Any failure that is neither an OS failure nor a cancellation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericFailure {
    pub type_name: String,
    pub value: String,
    pub args: Vec<Arg>,
    /// Most recent call last
    pub frames: Vec<Frame>,
}

impl GenericFailure {
    pub fn new(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
            args: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_frames(mut self, frames: Vec<Frame>) -> Self {
        self.frames = frames;
        self
    }
}

impl Failure {
    /// Classify an error returned to a boundary
    ///
    /// A `Cancelled` anywhere in the chain is a cancellation, an `io::Error`
    /// or `OsFailure` is an OS failure. Anything else is generic, with one
    /// argument per source in the chain.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let chain = || std::iter::successors(Some(err), |&e| e.source());

        if chain().any(|e| e.is::<Cancelled>()) {
            return Failure::Cancellation;
        }
        for e in chain() {
            if let Some(os) = e.downcast_ref::<OsFailure>() {
                return Failure::Os(os.clone());
            }
            if let Some(io) = e.downcast_ref::<io::Error>() {
                return Failure::Os(OsFailure::from_io(io));
            }
        }

        let mut generic = GenericFailure::new(type_name_of(err), err.to_string());
        for source in chain().skip(1) {
            generic = generic.with_arg(Arg::new(type_name_of(source), source.to_string()));
        }
        Failure::Generic(generic)
    }
}

/// First identifier of an error's `Debug` form, e.g. `ParseIntError`
fn type_name_of(err: &dyn Error) -> String {
    let debug = format!("{:?}", err);
    let name: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        "Error".to_string()
    } else {
        name
    }
}

// =============================================================================
// Reports
// =============================================================================

/// What gets logged for a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub headline: String,
    pub body: String,
    pub traceback: Vec<FileFrames>,
}

impl DiagnosticReport {
    /// Body followed by the rendered traceback, if any
    pub fn details(&self) -> String {
        if self.traceback.is_empty() {
            self.body.clone()
        } else {
            format!(
                "{}\n\ntraceback:\n{}",
                self.body,
                traceback::render(&self.traceback)
            )
        }
    }
}

/// Report for `failure`, or `None` for a cancellation
pub fn build_report(failure: &Failure, program: &str) -> Option<DiagnosticReport> {
    match failure {
        Failure::Cancellation => None,
        Failure::Os(os) => Some(DiagnosticReport {
            headline: OS_HEADLINE.to_string(),
            body: os_body(os),
            traceback: Vec::new(),
        }),
        Failure::Generic(generic) => Some(DiagnosticReport {
            headline: GENERIC_HEADLINE.to_string(),
            body: generic_body(generic),
            traceback: traceback::group_by_file(&generic.frames, program),
        }),
    }
}

fn os_body(os: &OsFailure) -> String {
    let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let descriptor = normalize(os);

    let fields = [
        ("type", descriptor.kind),
        ("errno", or_na(os.errno_name().map(str::to_string))),
        ("winerror", or_na(os.native_code.map(|c| c.to_string()))),
        ("strerror", or_na(Some(descriptor.message).filter(|m| !m.is_empty()))),
        ("filename", or_na(descriptor.path)),
        ("filename2", or_na(descriptor.path2)),
    ];

    fields
        .iter()
        .map(|(label, value)| format!("{:>9} = {}", label, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn generic_body(generic: &GenericFailure) -> String {
    let mut body = format!(
        "type = {}\nvalue = {}\nargs: ",
        generic.type_name, generic.value
    );
    for arg in &generic.args {
        body.push_str(&format!("\n  [{}] {}", arg.type_name, arg.value));
    }
    body
}

// =============================================================================
// Reporter
// =============================================================================

/// Result of handing a failure to the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Logged and alerted
    Reported,
    /// Left to default handling
    PassThrough,
}

pub struct Reporter {
    logger: Arc<Logger>,
    presenter: Box<dyn AlertPresenter>,
}

impl Reporter {
    /// Reporter using the native alert for this platform
    pub fn new(logger: Arc<Logger>) -> Self {
        Self::with_presenter(logger, platform::default_presenter())
    }

    pub fn with_presenter(logger: Arc<Logger>, presenter: Box<dyn AlertPresenter>) -> Self {
        Self { logger, presenter }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Log and alert `failure`
    ///
    /// Never fails. Logging and alert problems are sent to `tracing`.
    pub fn report(&self, failure: &Failure) -> Disposition {
        let program = self.logger.program_name().to_string();
        let Some(report) = build_report(failure, &program) else {
            return Disposition::PassThrough;
        };

        match self
            .logger
            .try_error_block(LOGGER_WAIT, &report.headline, &report.details())
        {
            Some(Ok(())) => {}
            Some(Err(e)) => tracing::warn!(error = %e, "failed to log failure report"),
            None => {
                // The logger is stuck, most likely held by the failing thread.
                eprintln!("{}\n{}", report.headline, report.details());
            }
        }

        let title = format!("Unexpected error in {}", program);
        if let Err(e) = self.presenter.alert(&title, &report.headline) {
            tracing::warn!(error = %e, "failed to show failure alert");
        }

        Disposition::Reported
    }

    /// Report an error returned from `main`
    pub fn report_error(&self, err: &(dyn Error + 'static)) -> Disposition {
        self.report(&Failure::from_error(err))
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}
