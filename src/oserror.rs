//! OS error normalization
//!
//! Turns platform-specific OS failure information (errno, native Windows error
//! code, message, filenames) into a portable `ErrorDescriptor`. Normalization
//! never fails: anything missing degrades to `None` or the `N/A` sentinel.

use crate::constants::{ARROW_R, NOT_AVAILABLE};
use std::fmt;
use std::io;
use std::path::Path;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use once_cell::sync::Lazy;

// =============================================================================
// Input
// =============================================================================

/// An OS-level failure as captured by the boundary that caught it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsFailure {
    /// Kind name, e.g. `NotFound`
    pub kind: String,
    pub errno: Option<i32>,
    /// Native OS error code (Win32 error on Windows)
    pub native_code: Option<i32>,
    pub message: String,
    pub path: Option<String>,
    pub path2: Option<String>,
}

impl OsFailure {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            errno: None,
            native_code: None,
            message: String::new(),
            path: None,
            path2: None,
        }
    }

    /// Capture an `io::Error`
    ///
    /// On Windows the raw OS error is a Win32 code; the errno is derived from
    /// it when a translation exists. Elsewhere the raw OS error is the errno.
    pub fn from_io(err: &io::Error) -> Self {
        let raw = err.raw_os_error();
        let mut failure = Self::new(format!("{:?}", err.kind())).with_message(io_message(err));

        #[cfg(windows)]
        {
            failure.native_code = raw;
            failure.errno = raw.and_then(errno_from_native);
        }
        #[cfg(not(windows))]
        {
            failure.errno = raw;
        }

        failure
    }

    pub fn with_errno(mut self, errno: i32) -> Self {
        self.errno = Some(errno);
        self
    }

    pub fn with_native_code(mut self, code: i32) -> Self {
        self.native_code = Some(code);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().display().to_string());
        self
    }

    pub fn with_path2(mut self, path: impl AsRef<Path>) -> Self {
        self.path2 = Some(path.as_ref().display().to_string());
        self
    }

    /// Symbolic errno name, absent for zero or unknown numbers
    pub fn errno_name(&self) -> Option<&'static str> {
        self.errno.filter(|&e| e != 0).and_then(errno_name)
    }

    /// `WinError<N>`, absent for zero
    pub fn native_name(&self) -> Option<String> {
        self.native_code
            .filter(|&c| c != 0)
            .map(|c| format!("WinError{}", c))
    }
}

impl From<&io::Error> for OsFailure {
    fn from(err: &io::Error) -> Self {
        Self::from_io(err)
    }
}

impl From<io::Error> for OsFailure {
    fn from(err: io::Error) -> Self {
        Self::from_io(&err)
    }
}

impl fmt::Display for OsFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_oserror(&self.kind, self))
    }
}

impl std::error::Error for OsFailure {}

/// Message of an `io::Error` without the ` (os error N)` suffix
fn io_message(err: &io::Error) -> String {
    let text = err.to_string();
    match text.rfind(" (os error ") {
        Some(pos) if text.ends_with(')') => text[..pos].to_string(),
        _ => text,
    }
}

// =============================================================================
// Output
// =============================================================================

/// Portable description of an OS failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub kind: String,
    /// `errno/native`, either one alone, or `N/A`
    pub code: String,
    /// Capitalized and period-terminated; empty if there was no message
    pub message: String,
    pub path: Option<String>,
    pub path2: Option<String>,
}

pub fn normalize(failure: &OsFailure) -> ErrorDescriptor {
    let errno = failure.errno_name();
    let native = failure.native_name();

    let code = match (errno, native) {
        (Some(e), Some(n)) => format!("{}/{}", e, n),
        (Some(e), None) => e.to_string(),
        (None, Some(n)) => n,
        (None, None) => NOT_AVAILABLE.to_string(),
    };

    ErrorDescriptor {
        kind: failure.kind.clone(),
        code,
        message: sentence(&failure.message),
        path: failure.path.clone(),
        path2: failure.path2.clone(),
    }
}

/// One-line-safe rendering of an OS failure in context
///
/// `Error [ENOENT] reading config '/etc/app.toml'.\nNo such file or directory.`
pub fn format_oserror(context: &str, failure: &OsFailure) -> String {
    let descriptor = normalize(failure);

    let paths: Vec<String> = [&descriptor.path, &descriptor.path2]
        .into_iter()
        .flatten()
        .map(|p| format!("'{}'", p))
        .collect();
    let paths = if paths.is_empty() {
        String::new()
    } else {
        format!(" {}", paths.join(&format!(" {} ", ARROW_R)))
    };

    format!(
        "Error [{}] {}{}.\n{}",
        descriptor.code, context, paths, descriptor.message
    )
}

/// Uppercase the first character and end with exactly one period
fn sentence(text: &str) -> String {
    let body = text.trim().trim_end_matches('.');
    let mut chars = body.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

// =============================================================================
// errno table
// =============================================================================

/// Every errno the platform defines, by number
#[cfg(unix)]
static ERRNO_NAMES: Lazy<Vec<(i32, String)>> = Lazy::new(|| {
    (1..MAX_ERRNO)
        .filter_map(|code| {
            let name = format!("{:?}", Errno::from_raw(code));
            name.starts_with('E').then_some((code, name))
        })
        .collect()
});

/// Above the highest errno of any supported unix
#[cfg(unix)]
const MAX_ERRNO: i32 = 512;

// C runtime numbering
#[cfg(not(unix))]
const ERRNO_NAMES: &[(i32, &str)] = &[
    (1, "EPERM"),
    (2, "ENOENT"),
    (3, "ESRCH"),
    (4, "EINTR"),
    (5, "EIO"),
    (6, "ENXIO"),
    (7, "E2BIG"),
    (8, "ENOEXEC"),
    (9, "EBADF"),
    (10, "ECHILD"),
    (11, "EAGAIN"),
    (12, "ENOMEM"),
    (13, "EACCES"),
    (14, "EFAULT"),
    (16, "EBUSY"),
    (17, "EEXIST"),
    (18, "EXDEV"),
    (19, "ENODEV"),
    (20, "ENOTDIR"),
    (21, "EISDIR"),
    (22, "EINVAL"),
    (23, "ENFILE"),
    (24, "EMFILE"),
    (25, "ENOTTY"),
    (27, "EFBIG"),
    (28, "ENOSPC"),
    (29, "ESPIPE"),
    (30, "EROFS"),
    (31, "EMLINK"),
    (32, "EPIPE"),
    (33, "EDOM"),
    (34, "ERANGE"),
    (36, "EDEADLK"),
    (38, "ENAMETOOLONG"),
    (39, "ENOLCK"),
    (40, "ENOSYS"),
    (41, "ENOTEMPTY"),
    (42, "EILSEQ"),
];

#[cfg(unix)]
fn errno_table() -> impl Iterator<Item = (i32, &'static str)> {
    ERRNO_NAMES.iter().map(|(code, name)| (*code, name.as_str()))
}

#[cfg(not(unix))]
fn errno_table() -> impl Iterator<Item = (i32, &'static str)> {
    ERRNO_NAMES.iter().copied()
}

/// Symbolic name of an errno number
pub fn errno_name(errno: i32) -> Option<&'static str> {
    errno_table()
        .find(|(code, _)| *code == errno)
        .map(|(_, name)| name)
}

/// errno number of a symbolic name
pub fn errno_code(name: &str) -> Option<i32> {
    errno_table()
        .find(|(_, n)| *n == name)
        .map(|(code, _)| code)
}

/// errno equivalent of common Win32 error codes
#[cfg(windows)]
fn errno_from_native(code: i32) -> Option<i32> {
    let name = match code {
        2 | 3 | 15 | 18 | 53 | 123 | 206 => "ENOENT",
        4 => "EMFILE",
        5 | 19 | 32 | 33 => "EACCES",
        6 => "EBADF",
        8 | 14 => "ENOMEM",
        17 => "EXDEV",
        80 | 183 => "EEXIST",
        87 => "EINVAL",
        109 | 232 => "EPIPE",
        112 => "ENOSPC",
        145 => "ENOTEMPTY",
        267 => "ENOTDIR",
        _ => return None,
    };
    errno_code(name)
}
