//! Log record types
//!
//! Core types for representing a single logging call.

use crate::constants::LEVEL_NAME_WIDTH;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a log record, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// All levels, least severe first
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// Upper-case name as rendered in preambles
    pub fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Honors width/fill so templates can pad level names.
        f.pad(self.name())
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// A single logging call, immutable once built
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<Local>,
    /// Calling function name (macros) or `file:line` (methods)
    pub source: String,
}

impl LogRecord {
    pub fn new(level: Level, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
            source: source.into(),
        }
    }

    /// Level name padded to the widest level name
    pub fn padded_level(&self) -> String {
        format!("{:<width$}", self.level, width = LEVEL_NAME_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
        assert!(Level::Error < Level::Critical);
    }

    #[test]
    fn test_level_padding() {
        let record = LogRecord::new(Level::Info, "main", "hello");
        assert_eq!(record.padded_level(), "INFO    ");

        let record = LogRecord::new(Level::Critical, "main", "hello");
        assert_eq!(record.padded_level(), "CRITICAL");
    }

    #[test]
    fn test_level_from_tracing() {
        assert_eq!(Level::from(&tracing::Level::TRACE), Level::Debug);
        assert_eq!(Level::from(&tracing::Level::WARN), Level::Warning);
        assert_eq!(Level::from(&tracing::Level::ERROR), Level::Error);
    }

    #[test]
    fn test_level_toml_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            level: Level,
        }

        let parsed: Wrapper = toml::from_str("level = \"warning\"").unwrap();
        assert_eq!(parsed.level, Level::Warning);

        let text = toml::to_string(&Wrapper {
            level: Level::Critical,
        })
        .unwrap();
        assert!(text.contains("level = \"critical\""));
    }
}
