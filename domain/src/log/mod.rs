//! Logging value objects
//!
//! Everything a logger needs to describe a record, independent of how the
//! record is formatted or where it is written.

pub mod level;
pub mod limits;
pub mod record;
pub mod values;

pub use level::{Level, ParseLevelError};
pub use limits::{MAX_VALUE_LENGTH, truncate_str, truncate_to_max_value_length};
pub use record::{Caller, Record};
pub use values::Values;
