//! Output sinks
//!
//! A sink is one configured destination: a file or a console stream, with its
//! own severity window and template. Writes are synchronous; every record is
//! flushed before the logging call returns.

use super::{Level, LogRecord, Template};
use crate::error::{LegionError, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a sink writes
///
/// In TOML: `target = "stdout"`, `target = "stderr"` or
/// `target = { file = "audit.log" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    File(PathBuf),
    Stdout,
    Stderr,
}

/// Immutable description of one sink
#[derive(Debug, Clone)]
pub struct DestinationConfig {
    pub name: &'static str,
    pub target: Target,
    pub min_level: Level,
    pub max_level: Level,
    pub template: Template,
}

impl DestinationConfig {
    /// True if `level` falls inside `[min_level, max_level]`
    pub fn accepts(&self, level: Level) -> bool {
        self.min_level <= level && level <= self.max_level
    }
}

/// In-memory writer shared between a sink and its reader
///
/// Used in place of the process stdout/stderr by embedding programs and tests.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    /// Written lines, without terminators
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Source of the writers behind `Target::Stdout` and `Target::Stderr`
#[derive(Debug, Clone, Default)]
pub enum ConsoleStreams {
    /// The process standard streams
    #[default]
    Standard,
    /// In-memory buffers
    Memory {
        stdout: SharedBuffer,
        stderr: SharedBuffer,
    },
}

impl ConsoleStreams {
    pub fn memory(stdout: SharedBuffer, stderr: SharedBuffer) -> Self {
        Self::Memory { stdout, stderr }
    }

    fn stdout(&self) -> Box<dyn Write + Send> {
        match self {
            Self::Standard => Box::new(io::stdout()),
            Self::Memory { stdout, .. } => Box::new(stdout.clone()),
        }
    }

    fn stderr(&self) -> Box<dyn Write + Send> {
        match self {
            Self::Standard => Box::new(io::stderr()),
            Self::Memory { stderr, .. } => Box::new(stderr.clone()),
        }
    }
}

/// An open sink
pub struct Sink {
    config: DestinationConfig,
    writer: Box<dyn Write + Send>,
}

impl Sink {
    /// Open the sink's target
    ///
    /// File targets are created or truncated now; console targets are taken
    /// from `console`.
    pub fn open(config: DestinationConfig, console: &ConsoleStreams) -> Result<Self> {
        let writer: Box<dyn Write + Send> = match &config.target {
            Target::File(path) => Box::new(open_truncate(path)?),
            Target::Stdout => console.stdout(),
            Target::Stderr => console.stderr(),
        };
        Ok(Self { config, writer })
    }

    pub fn config(&self) -> &DestinationConfig {
        &self.config
    }

    pub fn accepts(&self, level: Level) -> bool {
        self.config.accepts(level)
    }

    /// Format and write a record, one physical line per message line
    pub fn write(&mut self, record: &LogRecord, indent: &str) -> Result<()> {
        let mut text = String::new();
        for line in self.config.template.format(record, indent) {
            text.push_str(&line);
            text.push('\n');
        }

        self.writer
            .write_all(text.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|source| LegionError::SinkWrite {
                sink: self.config.name.to_string(),
                source,
            })
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink").field("config", &self.config).finish()
    }
}

fn open_truncate(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|source| LegionError::SinkOpen {
            path: path.to_path_buf(),
            source,
        })
}
