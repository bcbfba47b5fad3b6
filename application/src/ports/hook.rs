//! Hook port
//!
//! Hooks are callbacks the emission pipeline runs for every record at the
//! levels they subscribe to, e.g. to forward records to a remote collector.

use contextlog_domain::{Level, Record};
use thiserror::Error;

/// Error type hooks report failures with
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Per-record callback registered on a [`Logger`](super::logger::Logger)
pub trait Hook: Send + Sync {
    /// Levels this hook fires for
    fn levels(&self) -> &[Level] {
        &Level::ALL
    }

    /// Called before the record is formatted; may add fields.
    ///
    /// An error is reported but does not stop the record from being written.
    fn fire(&self, record: &mut Record) -> Result<(), BoxError>;
}

/// Errors from hook registration
#[derive(Error, Debug)]
pub enum HookError {
    #[error("hook registry is poisoned: a thread panicked while registering hooks")]
    Poisoned,
}
