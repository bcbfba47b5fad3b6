//! Domain layer for contextlog
//!
//! This crate contains the value objects shared by every logger
//! implementation. It has no dependencies on infrastructure concerns.
//!
//! # Core Concepts
//!
//! - **Level**: severity of a record, from `debug` up to `panic`
//! - **Values**: one layer of structured fields (request id, user id, ...)
//! - **Record**: a single event with its level, message, fields and caller

pub mod log;

// Re-export commonly used types
pub use log::{
    Caller, Level, MAX_VALUE_LENGTH, ParseLevelError, Record, Values, truncate_str,
    truncate_to_max_value_length,
};
