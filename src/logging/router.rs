//! Destination router
//!
//! Fans each record out to the sinks whose severity window accepts it, in the
//! fixed order the sinks were configured in.

use super::{ConsoleStreams, DestinationConfig, LogRecord, Sink};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct Router {
    sinks: Vec<Sink>,
}

impl Router {
    /// Open every destination, failing on the first one that cannot be opened
    pub fn open(destinations: Vec<DestinationConfig>, console: &ConsoleStreams) -> Result<Self> {
        let sinks = destinations
            .into_iter()
            .map(|config| Sink::open(config, console))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { sinks })
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn sinks(&self) -> impl Iterator<Item = &DestinationConfig> {
        self.sinks.iter().map(Sink::config)
    }

    /// Write `record` to every accepting sink; returns how many were written
    ///
    /// Stops at the first failing sink.
    pub fn route(&mut self, record: &LogRecord, indent: &str) -> Result<usize> {
        let mut written = 0;
        for sink in self.sinks.iter_mut().filter(|s| s.accepts(record.level)) {
            sink.write(record, indent)?;
            written += 1;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggerConfig;
    use crate::logging::{Level, SharedBuffer};

    fn console_router() -> (Router, SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let destinations = LoggerConfig::console_only().destinations().unwrap();
        let router =
            Router::open(destinations, &ConsoleStreams::memory(out.clone(), err.clone())).unwrap();
        (router, out, err)
    }

    #[test]
    fn test_debug_goes_nowhere_on_console() {
        let (mut router, out, err) = console_router();
        let written = router
            .route(&LogRecord::new(Level::Debug, "t", "hidden"), "")
            .unwrap();
        assert_eq!(written, 0);
        assert!(out.contents().is_empty());
        assert!(err.contents().is_empty());
    }

    #[test]
    fn test_info_to_stdout_only() {
        let (mut router, out, err) = console_router();
        router
            .route(&LogRecord::new(Level::Info, "t", "shown"), "")
            .unwrap();
        assert_eq!(out.lines(), vec!["shown"]);
        assert!(err.lines().is_empty());
    }

    #[test]
    fn test_warning_and_above_to_stderr_only() {
        let (mut router, out, err) = console_router();
        for level in [Level::Warning, Level::Error, Level::Critical] {
            router.route(&LogRecord::new(level, "t", "bad"), "").unwrap();
        }
        assert!(out.lines().is_empty());
        assert_eq!(err.lines().len(), 3);
    }

    #[test]
    fn test_empty_router() {
        let mut router = Router::default();
        assert!(router.is_empty());
        let written = router
            .route(&LogRecord::new(Level::Critical, "t", "x"), "")
            .unwrap();
        assert_eq!(written, 0);
    }
}
