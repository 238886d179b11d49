//! Platform abstraction layer
//!
//! Centralizes all platform-specific code (Windows, macOS).
//! Provides the `AlertPresenter` capability with a no-op implementation for
//! platforms without a native dialog.
//!
//! # Usage
//!
//! ```ignore
//! use crate::platform;
//!
//! let presenter = platform::default_presenter();
//! let _ = presenter.alert("Unexpected error in tool", "Unhandled exception.");
//! ```

#[cfg(target_os = "macos")]
mod macos;
#[cfg(windows)]
mod windows;

#[cfg(target_os = "macos")]
pub use macos::AppleScriptAlert;
#[cfg(windows)]
pub use windows::MessageBoxAlert;

use crate::error::Result;

/// Something able to show a modal alert to the user
///
/// Implementations must only show `message` as given; callers keep it to a
/// single short line.
pub trait AlertPresenter: Send + Sync {
    fn alert(&self, title: &str, message: &str) -> Result<()>;
}

/// Presenter for platforms without a native dialog
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlert;

impl AlertPresenter for NoAlert {
    fn alert(&self, _title: &str, _message: &str) -> Result<()> {
        Ok(())
    }
}

/// Native presenter for the current platform
///
/// - Windows: `MessageBoxW`
/// - macOS: `osascript` dialog
/// - Other platforms: No-op
pub fn default_presenter() -> Box<dyn AlertPresenter> {
    #[cfg(windows)]
    {
        Box::new(MessageBoxAlert)
    }
    #[cfg(target_os = "macos")]
    {
        Box::new(AppleScriptAlert)
    }
    #[cfg(not(any(windows, target_os = "macos")))]
    {
        Box::new(NoAlert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_alert_succeeds() {
        assert!(NoAlert.alert("title", "message").is_ok());
    }
}
