//! Centralized error types for legion
//!
//! All library errors are represented by the `LegionError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, LegionError>`.

use std::fmt;
use std::path::PathBuf;

/// All legion errors
#[derive(Debug)]
pub enum LegionError {
    // === Indentation ===
    /// Indent level was negative or did not fit in `usize`
    BadIndentLevel { level: String },

    // === Formatting ===
    /// Destination template could not be parsed
    Template { template: String, reason: String },

    // === Sinks ===
    /// Failed to open (truncate) a file sink
    SinkOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a formatted line to a sink
    SinkWrite {
        sink: String,
        source: std::io::Error,
    },

    // === Config ===
    /// Config file could not be read
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML or has bad values
    ConfigParse { path: PathBuf, reason: String },

    // === Platform ===
    /// Native alert dialog could not be shown
    Alert { reason: String },
}

impl std::error::Error for LegionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SinkOpen { source, .. }
            | Self::SinkWrite { source, .. }
            | Self::ConfigRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for LegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadIndentLevel { level } => write!(
                f,
                "Indentation level must be a non-negative integer (got {})",
                level
            ),
            Self::Template { template, reason } => {
                write!(f, "Invalid template '{}': {}", template, reason)
            }
            Self::SinkOpen { path, .. } => {
                write!(f, "Cannot open log file: {}", path.display())
            }
            Self::SinkWrite { sink, source } => {
                write!(f, "Cannot write to {} sink: {}", sink, source)
            }
            Self::ConfigRead { path, .. } => {
                write!(f, "Cannot read config: {}", path.display())
            }
            Self::ConfigParse { path, reason } => {
                write!(f, "Invalid config {}: {}", path.display(), reason)
            }
            Self::Alert { reason } => write!(f, "Cannot show alert: {}", reason),
        }
    }
}

/// Alias for Result with LegionError
pub type Result<T> = std::result::Result<T, LegionError>;
