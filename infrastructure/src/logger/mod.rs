//! JSON logger adapter
//!
//! [`ContextLogger`] implements the application's [`Entry`] and [`Logger`]
//! ports. Records are rendered by [`JsonFormatter`] and written to standard
//! error plus any number of append-mode files.
//!
//! [`Entry`]: contextlog_application::Entry
//! [`Logger`]: contextlog_application::Logger

mod context_logger;
mod entry;
mod error;
mod formatter;
mod layer;
mod output;
mod writer;

#[cfg(test)]
pub(crate) mod test_support;

pub use context_logger::{ContextLogger, ContextLoggerBuilder};
pub use entry::{ExitFn, LogEntry};
pub use error::{LoggerError, Result};
pub use formatter::{FieldKey, FieldMap, GELF_TIMESTAMP_FORMAT, JsonFormatter};
pub use layer::LoggerLayer;
pub use output::open_append;
pub use writer::LineWriter;
