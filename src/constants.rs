//! Application-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Time
// =============================================================================

/// strftime-style format for timestamps (`timestamp()` and log file preambles)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// =============================================================================
// Markers
// =============================================================================

/// Prefix of the header line of error blocks
pub const ERROR_MARKER: &str = "*** ";

/// Right arrow, used between source and destination paths
pub const ARROW_R: &str = "⟶";

/// Left arrow
pub const ARROW_L: &str = "⟵";

/// Placeholder for absent error codes and filenames
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// Indentation
// =============================================================================

/// Default character repeated once per indent level
pub const DEFAULT_INDENT_UNIT: char = ' ';

/// Deepest indent level; deeper requests are rejected
pub const MAX_INDENT_LEVEL: usize = 1024;

/// Width of the longest level name (`CRITICAL`)
pub const LEVEL_NAME_WIDTH: usize = 8;

// =============================================================================
// Templates
// =============================================================================

/// Debug file: full timestamp with milliseconds, level and source function
pub const DETAILED_TEMPLATE: &str = "{time}.{millis} {level} | {source}() {message}";

/// Log file: timestamp only
pub const TIMESTAMPED_TEMPLATE: &str = "{time} {message}";

/// Console streams: the message alone
pub const BARE_TEMPLATE: &str = "{message}";

// =============================================================================
// Program
// =============================================================================

/// Program name used when the executable path cannot be determined
pub const FALLBACK_PROGRAM_NAME: &str = "__unavailable__";
