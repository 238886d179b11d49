//! Running program identification
//!
//! The program name titles error blocks and alert dialogs.

use crate::constants::FALLBACK_PROGRAM_NAME;
use std::path::PathBuf;

/// Resolved path of the running executable
///
/// Falls back to a placeholder path when the executable cannot be determined.
pub fn path() -> PathBuf {
    std::env::current_exe()
        .and_then(|p| p.canonicalize())
        .unwrap_or_else(|_| PathBuf::from(FALLBACK_PROGRAM_NAME))
}

/// File stem of the running executable
pub fn name() -> String {
    path()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_PROGRAM_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_has_no_extension() {
        let name = name();
        assert!(!name.is_empty());
        assert!(!name.ends_with(".exe"));
    }

    #[test]
    fn test_path_is_absolute() {
        assert!(path().is_absolute());
    }
}
