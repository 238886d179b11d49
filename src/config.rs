//! Configuration management
//!
//! The logger is configured through `LoggerConfig`, which can be built in code
//! or loaded from the `[logging]` table of a TOML file.

use crate::constants::{
    BARE_TEMPLATE, DEFAULT_INDENT_UNIT, DETAILED_TEMPLATE, TIMESTAMPED_TEMPLATE,
};
use crate::error::{LegionError, Result};
use crate::logging::{DestinationConfig, Level, Target, Template};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// File format
// =============================================================================

/// Top-level config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggerConfig,
}

// =============================================================================
// Logger Configuration
// =============================================================================

/// Sink topology of a logger
///
/// - `debug_file`: every record, timestamped with milliseconds, level and source
/// - `log_file`: INFO and above, timestamped
/// - `console`: INFO (only) to stdout, WARNING and above to stderr, bare
///
/// Absent (or empty) paths create no file. With no paths and `console` off,
/// nothing is output at all.
///
/// A non-empty `destinations` list replaces that default topology entirely:
///
/// ```toml
/// [[logging.destinations]]
/// target = { file = "audit.log" }
/// min_level = "warning"
/// template = "{time} [{level}] {message}"
///
/// [[logging.destinations]]
/// target = "stderr"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub debug_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub console: bool,
    /// Character repeated once per indent level
    pub indent_unit: char,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub destinations: Vec<DestinationEntry>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            debug_file: None,
            log_file: None,
            console: true,
            indent_unit: DEFAULT_INDENT_UNIT,
            destinations: Vec::new(),
        }
    }
}

/// One sink of a custom topology
///
/// Levels default to the full range and the template to the bare message.
/// A window whose `min_level` is above its `max_level` accepts nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationEntry {
    pub target: Target,
    #[serde(default = "lowest_level")]
    pub min_level: Level,
    #[serde(default = "highest_level")]
    pub max_level: Level,
    #[serde(default = "bare_template")]
    pub template: String,
}

fn lowest_level() -> Level {
    Level::Debug
}

fn highest_level() -> Level {
    Level::Critical
}

fn bare_template() -> String {
    BARE_TEMPLATE.to_string()
}

impl DestinationEntry {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            min_level: lowest_level(),
            max_level: highest_level(),
            template: bare_template(),
        }
    }

    pub fn with_levels(mut self, min_level: Level, max_level: Level) -> Self {
        self.min_level = min_level;
        self.max_level = max_level;
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    fn build(&self) -> Result<DestinationConfig> {
        Ok(DestinationConfig {
            name: "custom",
            target: self.target.clone(),
            min_level: self.min_level,
            max_level: self.max_level,
            template: Template::parse(&self.template)?,
        })
    }
}

impl LoggerConfig {
    /// Console only, no files
    pub fn console_only() -> Self {
        Self::default()
    }

    pub fn with_debug_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.debug_file = Some(path.into());
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Add a custom sink; any custom sink disables the default topology
    pub fn with_destination(mut self, entry: DestinationEntry) -> Self {
        self.destinations.push(entry);
        self
    }

    /// Destinations in write order
    ///
    /// The custom list as given, or else the default topology: debug file,
    /// log file, stdout, stderr.
    pub fn destinations(&self) -> Result<Vec<DestinationConfig>> {
        if !self.destinations.is_empty() {
            return self.destinations.iter().map(DestinationEntry::build).collect();
        }

        let mut destinations = Vec::with_capacity(4);

        if let Some(path) = non_empty(&self.debug_file) {
            destinations.push(DestinationConfig {
                name: "debug file",
                target: Target::File(path.to_path_buf()),
                min_level: Level::Debug,
                max_level: Level::Critical,
                template: Template::parse(DETAILED_TEMPLATE)?,
            });
        }

        if let Some(path) = non_empty(&self.log_file) {
            destinations.push(DestinationConfig {
                name: "log file",
                target: Target::File(path.to_path_buf()),
                min_level: Level::Info,
                max_level: Level::Critical,
                template: Template::parse(TIMESTAMPED_TEMPLATE)?,
            });
        }

        if self.console {
            destinations.push(DestinationConfig {
                name: "stdout",
                target: Target::Stdout,
                min_level: Level::Info,
                max_level: Level::Info,
                template: Template::parse(BARE_TEMPLATE)?,
            });
            destinations.push(DestinationConfig {
                name: "stderr",
                target: Target::Stderr,
                min_level: Level::Warning,
                max_level: Level::Critical,
                template: Template::parse(BARE_TEMPLATE)?,
            });
        }

        Ok(destinations)
    }
}

fn non_empty(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}

// =============================================================================
// Loading
// =============================================================================

/// Parse config from TOML text
pub fn from_toml_str(path: &Path, content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| LegionError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load config from a TOML file
pub fn load(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|source| LegionError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    from_toml_str(path, &content)
}

// ============================================================================
// Tests
// ============================================================================
