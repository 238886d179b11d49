//! Windows platform implementation
//!
//! Uses the official `windows` crate for type-safe Windows API bindings.

use super::AlertPresenter;
use crate::error::{LegionError, Result};
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use windows::core::PCWSTR;
use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONWARNING, MB_OK};

/// Warning message box with a single OK button
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageBoxAlert;

fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

impl AlertPresenter for MessageBoxAlert {
    fn alert(&self, title: &str, message: &str) -> Result<()> {
        let title = to_wide(title);
        let message = to_wide(message);

        // Both buffers are NUL-terminated and outlive the call.
        let result = unsafe {
            MessageBoxW(
                None,
                PCWSTR(message.as_ptr()),
                PCWSTR(title.as_ptr()),
                MB_OK | MB_ICONWARNING,
            )
        };

        if result.0 == 0 {
            return Err(LegionError::Alert {
                reason: std::io::Error::last_os_error().to_string(),
            });
        }
        Ok(())
    }
}
