//! Logger port
//!
//! A [`Logger`] is the root [`Entry`] plus hook registration.

use super::entry::Entry;
use super::hook::{Hook, HookError};
use crate::context::Context;
use contextlog_domain::{Caller, Level, Values};
use std::fmt;
use std::io;
use std::sync::Arc;

/// Root logger: an entry that also accepts hooks
pub trait Logger: Entry {
    /// Register `hooks` as one batch.
    ///
    /// Either every hook in the batch is registered or none is.
    fn add_hooks(&self, hooks: Vec<Arc<dyn Hook>>) -> Result<(), HookError>;
}

impl<T: Logger + ?Sized> Logger for Arc<T> {
    fn add_hooks(&self, hooks: Vec<Arc<dyn Hook>>) -> Result<(), HookError> {
        (**self).add_hooks(hooks)
    }
}

/// No-op logger for tests and when logging is disabled.
///
/// Nothing is ever enabled, `exit` returns without exiting and graceful
/// fatal requests are discarded. `panic` still panics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLogger;

impl Entry for NoLogger {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn log(&self, _level: Level, _message: &dyn fmt::Display, _caller: Caller) {}

    fn exit(&self, _code: i32) {}

    fn graceful_fatal(&self, _ctx: &Context) {}

    fn writer(&self) -> Box<dyn io::Write + Send> {
        Box::new(io::sink())
    }

    fn with_values(&self, _values: Values) -> Arc<dyn Entry> {
        Arc::new(NoLogger)
    }

    fn get_values(&self) -> Values {
        Values::new()
    }

    fn new_context(&self, ctx: &Context) -> Context {
        ctx.with_entry(Arc::new(NoLogger))
    }
}

impl Logger for NoLogger {
    fn add_hooks(&self, _hooks: Vec<Arc<dyn Hook>>) -> Result<(), HookError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::entry::EntryExt;

    #[test]
    fn test_no_logger_is_silent() {
        let logger = NoLogger;
        assert!(Level::ALL.iter().all(|l| !logger.enabled(*l)));

        logger.info("goes nowhere");
        logger.fatal("does not exit");
        assert!(logger.add_hooks(vec![]).is_ok());
    }

    #[test]
    fn test_no_logger_context_round_trip() {
        let logger = NoLogger;
        let ctx = logger.new_context(&Context::background());
        let stored = logger.from_context(&ctx).unwrap();
        assert!(stored.get_values().is_empty());
        assert!(logger.from_context(&Context::background()).is_none());
    }
}
