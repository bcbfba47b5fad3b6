//! Entry port
//!
//! An [`Entry`] is a logger handle carrying an accumulated set of fields.
//! Enriching an entry never mutates it: [`Entry::with_values`] hands back a
//! new entry whose fields are the union of the old ones and the new ones.

use crate::context::Context;
use contextlog_domain::{Caller, Level, Values};
use std::fmt;
use std::io;
use std::sync::Arc;

/// Leveled, field-carrying log handle
///
/// Implementations must be safe to share between threads; emission from
/// several threads at once is expected.
pub trait Entry: Send + Sync {
    /// Whether a record at `level` would be written
    fn enabled(&self, level: Level) -> bool;

    /// Emit one record with this entry's fields.
    ///
    /// Records below the configured threshold are dropped. This never
    /// terminates the process or panics; [`EntryExt::fatal`] and
    /// [`EntryExt::panic`] layer that on top.
    fn log(&self, level: Level, message: &dyn fmt::Display, caller: Caller);

    /// Terminate the process with `code` (called by [`EntryExt::fatal`])
    fn exit(&self, code: i32);

    /// Ask the supervising task to shut the process down.
    ///
    /// Never blocks. If nobody is ready to receive the signal it is dropped.
    fn graceful_fatal(&self, ctx: &Context);

    /// A writer whose every line is logged at `info` with this entry's fields
    fn writer(&self) -> Box<dyn io::Write + Send>;

    /// New entry with `values` merged over this entry's fields
    fn with_values(&self, values: Values) -> Arc<dyn Entry>;

    /// Copy of the fields accumulated so far
    fn get_values(&self) -> Values;

    /// The entry stored in `ctx`, or `None` if there isn't one
    fn from_context(&self, ctx: &Context) -> Option<Arc<dyn Entry>> {
        ctx.entry()
    }

    /// A copy of `ctx` carrying this entry
    fn new_context(&self, ctx: &Context) -> Context;

    /// `value`, cut down to the longest field value the log backend accepts
    fn truncate_to_max_value_length<'a>(&self, value: &'a [u8]) -> &'a [u8] {
        contextlog_domain::truncate_to_max_value_length(value)
    }
}

impl<T: Entry + ?Sized> Entry for Arc<T> {
    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn log(&self, level: Level, message: &dyn fmt::Display, caller: Caller) {
        (**self).log(level, message, caller)
    }

    fn exit(&self, code: i32) {
        (**self).exit(code)
    }

    fn graceful_fatal(&self, ctx: &Context) {
        (**self).graceful_fatal(ctx)
    }

    fn writer(&self) -> Box<dyn io::Write + Send> {
        (**self).writer()
    }

    fn with_values(&self, values: Values) -> Arc<dyn Entry> {
        (**self).with_values(values)
    }

    fn get_values(&self) -> Values {
        (**self).get_values()
    }

    fn from_context(&self, ctx: &Context) -> Option<Arc<dyn Entry>> {
        (**self).from_context(ctx)
    }

    fn new_context(&self, ctx: &Context) -> Context {
        (**self).new_context(ctx)
    }

    fn truncate_to_max_value_length<'a>(&self, value: &'a [u8]) -> &'a [u8] {
        (**self).truncate_to_max_value_length(value)
    }
}

/// Convenience emission methods, one per level
pub trait EntryExt: Entry {
    #[track_caller]
    fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, &message, Caller::here());
    }

    #[track_caller]
    fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, &message, Caller::here());
    }

    #[track_caller]
    fn warning(&self, message: impl fmt::Display) {
        self.log(Level::Warning, &message, Caller::here());
    }

    #[track_caller]
    fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, &message, Caller::here());
    }

    /// Log at `fatal`, then exit with status 1.
    ///
    /// The exit happens even when the threshold filters the record out.
    #[track_caller]
    fn fatal(&self, message: impl fmt::Display) {
        self.log(Level::Fatal, &message, Caller::here());
        self.exit(1);
    }

    /// Log at `panic`, then panic with the same message
    #[track_caller]
    fn panic(&self, message: impl fmt::Display) -> ! {
        let message = message.to_string();
        self.log(Level::Panic, &message, Caller::here());
        panic!("{message}")
    }
}

impl<T: Entry + ?Sized> EntryExt for T {}

/// Emit a formatted record, recording the calling module as `func`.
///
/// ```ignore
/// emit!(entry, Level::Info, "user {} logged in", user_id);
/// ```
#[macro_export]
macro_rules! emit {
    ($entry:expr, $level:expr, $($arg:tt)+) => {
        $crate::ports::entry::Entry::log(
            &$entry,
            $level,
            &::std::format_args!($($arg)+),
            $crate::__private::Caller::new(
                ::std::file!(),
                ::std::line!(),
                ::std::option::Option::Some(::std::module_path!()),
            ),
        )
    };
}
