//! Traceback frames
//!
//! Frames are captured from a `std::backtrace::Backtrace`, keeping only those
//! with a source location outside the Rust standard library, ordered with the
//! most recent call last. For display they are grouped by consecutive source
//! file.

use std::backtrace::Backtrace;
use std::fmt::Write as _;
use std::fs;

/// One call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub file: String,
    pub line: u32,
    pub function: String,
    /// Source line, when the file is readable
    pub code: Option<String>,
}

impl Frame {
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// True for the program entry point (`main` at a crate root)
    fn is_entry_point(&self) -> bool {
        let mut segments = self.function.rsplit("::");
        segments.next() == Some("main") && segments.count() <= 1
    }
}

/// Consecutive frames from the same file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFrames {
    pub file: String,
    pub frames: Vec<Frame>,
}

/// Group consecutive frames by file, relabeling the entry point with `program`
pub fn group_by_file(frames: &[Frame], program: &str) -> Vec<FileFrames> {
    let mut groups: Vec<FileFrames> = Vec::new();

    for frame in frames {
        let mut frame = frame.clone();
        if frame.is_entry_point() {
            frame.function = program.to_string();
        }

        match groups.last_mut() {
            Some(group) if group.file == frame.file => group.frames.push(frame),
            _ => groups.push(FileFrames {
                file: frame.file.clone(),
                frames: vec![frame],
            }),
        }
    }

    groups
}

/// Render grouped frames
///
/// ```text
/// ▸ src/main.rs
///   12, tool: run(&config)?;
///   40, run: copy_all(&files)?;
/// ```
pub fn render(groups: &[FileFrames]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "▸ {}", group.file);
        for frame in &group.frames {
            match &frame.code {
                Some(code) => {
                    let _ = writeln!(out, "  {}, {}: {}", frame.line, frame.function, code);
                }
                None => {
                    let _ = writeln!(out, "  {}, {}", frame.line, frame.function);
                }
            }
        }
    }
    out
}

/// Capture the current call stack
pub fn capture() -> Vec<Frame> {
    let mut frames = parse_backtrace(&Backtrace::force_capture().to_string());
    for frame in &mut frames {
        frame.code = source_line(&frame.file, frame.line);
    }
    frames
}

/// Parse the `Display` form of a backtrace
///
/// ```text
///    3: tool::run
///              at ./src/main.rs:40:5
/// ```
pub fn parse_backtrace(text: &str) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut function: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(location) = line.strip_prefix("at ") {
            let (Some(name), Some((file, lineno))) = (function.take(), split_location(location))
            else {
                continue;
            };
            if !is_library_frame(&file, &name) {
                frames.push(Frame::new(file, lineno, name));
            }
        } else if let Some((index, name)) = line.split_once(": ") {
            if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) {
                function = Some(strip_hash(name).to_string());
            }
        }
    }

    // Backtraces list the innermost call first.
    frames.reverse();
    frames
}

/// `path:line:column` → (path, line)
fn split_location(location: &str) -> Option<(String, u32)> {
    let mut parts = location.rsplitn(3, ':');
    let _column = parts.next()?;
    let line = parts.next()?.parse().ok()?;
    let file = parts.next()?;
    Some((file.to_string(), line))
}

/// Drop a trailing `::h0123456789abcdef` symbol hash
fn strip_hash(name: &str) -> &str {
    match name.rsplit_once("::h") {
        Some((base, hash)) if hash.len() == 16 && hash.chars().all(|c| c.is_ascii_hexdigit()) => {
            base
        }
        _ => name,
    }
}

fn is_library_frame(file: &str, function: &str) -> bool {
    const OWN_REPORTING: &str = concat!(env!("CARGO_CRATE_NAME"), "::report::");

    file.starts_with("/rustc/")
        || file.contains("/library/std/")
        || file.contains("/library/core/")
        || file.contains("/library/alloc/")
        || function.starts_with(OWN_REPORTING)
        || function.starts_with("std::")
        || function.starts_with("core::")
        || function.starts_with("<alloc::")
}

fn source_line(file: &str, line: u32) -> Option<String> {
    let index = usize::try_from(line).ok()?.checked_sub(1)?;
    let content = fs::read_to_string(file).ok()?;
    content
        .lines()
        .nth(index)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
   0: std::backtrace_rs::backtrace::libunwind::trace
             at /rustc/abc/library/std/src/../../backtrace/src/backtrace/libunwind.rs:116:5
   1: legion::report::hook::install_panic_hook::{{closure}}
             at ./src/report/hook.rs:30:9
   2: tool::copy_file::h0123456789abcdef
             at ./src/files.rs:12:5
   3: tool::run
             at ./src/main.rs:40:5
   4: tool::main
             at ./src/main.rs:8:5
   5: core::ops::function::FnOnce::call_once
             at /rustc/abc/library/core/src/ops/function.rs:250:5
   6: main
   7: __libc_start_main
";

    #[test]
    fn test_parse_backtrace_keeps_user_frames() {
        let frames = parse_backtrace(SAMPLE);
        let summary: Vec<(&str, u32, &str)> = frames
            .iter()
            .map(|f| (f.file.as_str(), f.line, f.function.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("./src/main.rs", 8, "tool::main"),
                ("./src/main.rs", 40, "tool::run"),
                ("./src/files.rs", 12, "tool::copy_file"),
            ]
        );
    }

    #[test]
    fn test_group_by_file_and_relabel_entry() {
        let frames = vec![
            Frame::new("src/main.rs", 8, "tool::main").with_code("run()?;"),
            Frame::new("src/main.rs", 40, "tool::run"),
            Frame::new("src/files.rs", 12, "tool::copy_file"),
            Frame::new("src/main.rs", 55, "tool::helper"),
        ];

        let groups = group_by_file(&frames, "tool");
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].file, "src/main.rs");
        assert_eq!(groups[0].frames.len(), 2);
        assert_eq!(groups[0].frames[0].function, "tool");
        assert_eq!(groups[1].file, "src/files.rs");
        assert_eq!(groups[2].file, "src/main.rs");
    }

    #[test]
    fn test_nested_main_not_relabeled() {
        let frames = vec![Frame::new("src/cli.rs", 3, "tool::cli::main")];
        let groups = group_by_file(&frames, "tool");
        assert_eq!(groups[0].frames[0].function, "tool::cli::main");
    }

    #[test]
    fn test_render() {
        let frames = vec![
            Frame::new("src/main.rs", 8, "tool::main").with_code("run()?;"),
            Frame::new("src/main.rs", 40, "tool::run"),
        ];
        let text = render(&group_by_file(&frames, "tool"));
        assert_eq!(text, "▸ src/main.rs\n  8, tool: run()?;\n  40, tool::run\n");
    }

    #[test]
    fn test_split_location_with_colons_in_path() {
        assert_eq!(
            split_location(r"C:\src\main.rs:10:5"),
            Some((r"C:\src\main.rs".to_string(), 10))
        );
        assert_eq!(split_location("nowhere"), None);
    }

    #[test]
    fn test_strip_hash() {
        assert_eq!(strip_hash("tool::run::h0123456789abcdef"), "tool::run");
        assert_eq!(strip_hash("tool::helper"), "tool::helper");
    }

    #[test]
    fn test_source_line_reads_this_file() {
        let file = file!();
        let line = line!();
        // Tests run from the package root, where `file!()` paths resolve.
        if let Some(code) = source_line(file, line) {
            assert!(code.contains("line!()"));
        }
    }
}
