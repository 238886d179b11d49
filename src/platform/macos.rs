//! macOS platform implementation
//!
//! Alerts are shown by `osascript`. The script is passed as a process
//! argument, never through a shell.

use super::AlertPresenter;
use crate::error::{LegionError, Result};
use std::process::{Command, Stdio};

/// `display dialog` with a caution icon and an OK button
#[derive(Debug, Clone, Copy, Default)]
pub struct AppleScriptAlert;

/// Quote `text` as an AppleScript string literal
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' | '\r' => quoted.push(' '),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn dialog_script(title: &str, message: &str) -> String {
    format!(
        "display dialog {} with title {} with icon caution buttons {{\"OK\"}}",
        quote(message),
        quote(title)
    )
}

impl AlertPresenter for AppleScriptAlert {
    fn alert(&self, title: &str, message: &str) -> Result<()> {
        let status = Command::new("osascript")
            .arg("-e")
            .arg(dialog_script(title, message))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| LegionError::Alert {
                reason: format!("osascript: {}", e),
            })?;

        if !status.success() {
            return Err(LegionError::Alert {
                reason: format!("osascript exited with {}", status),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"say "hi" \ bye"#), r#""say \"hi\" \\ bye""#);
        assert_eq!(quote("two\nlines"), "\"two lines\"");
    }

    #[test]
    fn test_dialog_script() {
        assert_eq!(
            dialog_script("Unexpected error in tool", "Unhandled exception."),
            "display dialog \"Unhandled exception.\" with title \"Unexpected error in tool\" \
             with icon caution buttons {\"OK\"}"
        );
    }
}
