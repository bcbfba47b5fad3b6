//! Log record and caller location

use super::{Level, Values};
use chrono::{DateTime, Local};
use std::panic::Location;

/// Source location that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
    /// Module path of the emitting code, when known
    pub func: Option<&'static str>,
}

impl Caller {
    pub fn new(file: &'static str, line: u32, func: Option<&'static str>) -> Self {
        Self { file, line, func }
    }

    /// Location of whoever called the current `#[track_caller]` function
    #[track_caller]
    pub fn here() -> Self {
        Self::from(Location::caller())
    }

    /// `file:line`, the way records report it
    pub fn file_line(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            func: None,
        }
    }
}

/// A single log event on its way to the formatter
///
/// Hooks receive it mutably before formatting and may add fields.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub values: Values,
    pub caller: Caller,
}

impl Record {
    /// Create a record stamped with the current local time
    pub fn new(level: Level, message: impl Into<String>, values: Values, caller: Caller) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
            values,
            caller,
        }
    }
}
