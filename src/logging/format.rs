//! Multiline, indentation-aware record formatting
//!
//! A destination template is parsed once into segments. The part before
//! `{message}` is the preamble; it is reproduced on every physical line of the
//! message, so a multiline record reads like several records.
//!
//! Placeholders: `{time}`, `{millis}`, `{level}`, `{source}`, `{message}`.
//! Literal braces are written `{{` and `}}`.

use super::LogRecord;
use crate::constants::TIMESTAMP_FORMAT;
use crate::error::{LegionError, Result};
use chrono::Timelike;
use std::fmt::Write as _;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Time,
    Millis,
    Level,
    Source,
}

/// Parsed destination template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
    preamble: Vec<Segment>,
    suffix: Vec<Segment>,
}

impl Template {
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: &str| LegionError::Template {
            template: text.to_string(),
            reason: reason.to_string(),
        };

        let mut preamble = Vec::new();
        let mut suffix = Vec::new();
        let mut seen_message = false;
        let mut literal = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(invalid("unmatched '}'")),
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => name.push(ch),
                            None => return Err(invalid("unterminated placeholder")),
                        }
                    }

                    let target = if seen_message {
                        &mut suffix
                    } else {
                        &mut preamble
                    };
                    if !literal.is_empty() {
                        target.push(Segment::Literal(std::mem::take(&mut literal)));
                    }

                    match name.as_str() {
                        "time" => target.push(Segment::Time),
                        "millis" => target.push(Segment::Millis),
                        "level" => target.push(Segment::Level),
                        "source" => target.push(Segment::Source),
                        "message" if seen_message => {
                            return Err(invalid("'{message}' appears more than once"))
                        }
                        "message" => seen_message = true,
                        other => {
                            return Err(invalid(&format!("unknown placeholder '{{{}}}'", other)))
                        }
                    }
                }
                _ => literal.push(c),
            }
        }

        if !seen_message {
            return Err(invalid("missing '{message}'"));
        }
        if !literal.is_empty() {
            suffix.push(Segment::Literal(literal));
        }

        Ok(Self {
            text: text.to_string(),
            preamble,
            suffix,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True if the template renders the record time
    pub fn is_timestamped(&self) -> bool {
        self.preamble
            .iter()
            .chain(&self.suffix)
            .any(|s| matches!(s, Segment::Time | Segment::Millis))
    }

    /// Render a record into physical lines
    ///
    /// Every message line gets the preamble, the indent prefix and the suffix,
    /// then is right-trimmed. Blank messages collapse to a single bare
    /// preamble line without indentation.
    pub fn format(&self, record: &LogRecord, indent: &str) -> Vec<String> {
        let preamble = render(&self.preamble, record);
        let suffix = render(&self.suffix, record);

        if record.message.trim().is_empty() {
            return vec![format!("{}{}", preamble, suffix).trim_end().to_string()];
        }

        record
            .message
            .split('\n')
            .map(|line| {
                let line = line.strip_suffix('\r').unwrap_or(line);
                format!("{}{}{}{}", preamble, indent, line, suffix)
                    .trim_end()
                    .to_string()
            })
            .collect()
    }
}

impl FromStr for Template {
    type Err = LegionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn render(segments: &[Segment], record: &LogRecord) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Time => {
                let _ = write!(out, "{}", record.timestamp.format(TIMESTAMP_FORMAT));
            }
            Segment::Millis => {
                let millis = record.timestamp.nanosecond() / 1_000_000;
                // Leap seconds report nanoseconds past 1e9.
                let _ = write!(out, "{:04}", millis.min(999));
            }
            Segment::Level => out.push_str(&record.padded_level()),
            Segment::Source => out.push_str(&record.source),
        }
    }
    out
}
