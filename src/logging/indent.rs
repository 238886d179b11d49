//! Indentation state
//!
//! Nesting level used to visually group related log lines. The level is a
//! `usize`, so it can never go negative: decrements saturate at zero and
//! increments stop at `MAX_INDENT_LEVEL`.

use crate::constants::{DEFAULT_INDENT_UNIT, MAX_INDENT_LEVEL};
use crate::error::{LegionError, Result};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentState {
    level: usize,
    unit: char,
    /// `unit` repeated `level` times, rebuilt on every change
    prefix: String,
}

impl IndentState {
    pub fn new(unit: char) -> Self {
        Self {
            level: 0,
            unit,
            prefix: String::new(),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn unit(&self) -> char {
        self.unit
    }

    /// Prefix applied to every message line
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Increase by one, up to `MAX_INDENT_LEVEL`
    pub fn increase(&mut self) {
        self.apply((self.level + 1).min(MAX_INDENT_LEVEL));
    }

    /// Decrease by one, staying at zero
    pub fn decrease(&mut self) {
        self.apply(self.level.saturating_sub(1));
    }

    /// Set an absolute level
    ///
    /// Accepts any integer type; negative values and values above
    /// `MAX_INDENT_LEVEL` are rejected and leave the state untouched.
    pub fn set<L>(&mut self, level: L) -> Result<()>
    where
        L: TryInto<usize> + Display + Copy,
    {
        let value = level
            .try_into()
            .ok()
            .filter(|v| *v <= MAX_INDENT_LEVEL)
            .ok_or_else(|| LegionError::BadIndentLevel {
                level: level.to_string(),
            })?;
        self.apply(value);
        Ok(())
    }

    pub(crate) fn set_unit(&mut self, unit: char) {
        self.unit = unit;
        self.apply(self.level);
    }

    fn apply(&mut self, level: usize) {
        self.level = level;
        self.prefix = std::iter::repeat(self.unit).take(level).collect();
    }
}

impl Default for IndentState {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT_UNIT)
    }
}
