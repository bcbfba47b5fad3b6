//! Entry handle over the shared logger core

use super::formatter::JsonFormatter;
use super::output::Output;
use super::writer::LineWriter;
use contextlog_application::{Context, Entry, Hook, ShutdownSender};
use contextlog_domain::{Caller, Level, Record, Values};
use std::fmt;
use std::io;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info_span, warn};

/// Called by `fatal` once the record is written
pub type ExitFn = Arc<dyn Fn(i32) + Send + Sync>;

/// State shared by a logger and every entry derived from it
pub(crate) struct Core {
    pub(crate) level: Level,
    pub(crate) formatter: JsonFormatter,
    pub(crate) output: Output,
    pub(crate) hooks: RwLock<Vec<Arc<dyn Hook>>>,
    pub(crate) shutdown: ShutdownSender,
    pub(crate) exit: ExitFn,
}

impl Core {
    fn emit(&self, level: Level, message: &dyn fmt::Display, values: &Values, caller: Caller) {
        if !self.level.enables(level) {
            return;
        }

        let mut record = Record::new(level, message.to_string(), values.clone(), caller);
        self.fire_hooks(&mut record);
        self.output.write(&self.formatter.format(&record));
    }

    /// Hooks run on a snapshot of the registry, so a hook may log or
    /// register hooks itself without deadlocking.
    fn fire_hooks(&self, record: &mut Record) {
        let level = record.level;
        let hooks: Vec<Arc<dyn Hook>> = match self.hooks.read() {
            Ok(registry) => registry
                .iter()
                .filter(|h| h.levels().contains(&level))
                .cloned()
                .collect(),
            Err(_) => return,
        };
        for hook in hooks {
            if let Err(e) = hook.fire(record) {
                warn!(error = %e, %level, "failed to fire hook");
            }
        }
    }

    /// Offer `ctx` to the shutdown receiver without waiting for it
    fn signal_shutdown(&self, ctx: &Context) {
        let span = info_span!(parent: ctx.span(), "graceful fatal");
        let _entered = span.enter();

        match self.shutdown.try_send(ctx.with_span(span.clone())) {
            Ok(()) => debug!("graceful fatal signal delivered"),
            Err(TrySendError::Full(_)) => {
                debug!("graceful fatal signal dropped: receiver is not ready")
            }
            Err(TrySendError::Closed(_)) => {
                debug!("graceful fatal signal dropped: channel is closed")
            }
        }
    }
}

/// Logger handle carrying an accumulated field set
///
/// Cloning is cheap. Enrichment allocates a fresh field map, so a derived
/// entry never shares mutable state with the entry it came from.
#[derive(Clone)]
pub struct LogEntry {
    core: Arc<Core>,
    values: Arc<Values>,
}

impl LogEntry {
    pub(crate) fn root(core: Arc<Core>) -> Self {
        Self {
            core,
            values: Arc::new(Values::new()),
        }
    }

    /// Field-less entry over the same core
    pub(crate) fn fresh(&self) -> Self {
        Self::root(Arc::clone(&self.core))
    }

    pub(crate) fn core(&self) -> &Core {
        &self.core
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn level(&self) -> Level {
        self.core.level
    }
}

impl fmt::Debug for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEntry")
            .field("level", &self.core.level)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

impl Entry for LogEntry {
    fn enabled(&self, level: Level) -> bool {
        self.core.level.enables(level)
    }

    fn log(&self, level: Level, message: &dyn fmt::Display, caller: Caller) {
        self.core.emit(level, message, &self.values, caller);
    }

    fn exit(&self, code: i32) {
        (self.core.exit)(code);
    }

    fn graceful_fatal(&self, ctx: &Context) {
        self.core.signal_shutdown(ctx);
    }

    fn writer(&self) -> Box<dyn io::Write + Send> {
        Box::new(LineWriter::new(self.clone()))
    }

    fn with_values(&self, values: Values) -> Arc<dyn Entry> {
        Arc::new(LogEntry {
            core: Arc::clone(&self.core),
            values: Arc::new(self.values.merged(&values)),
        })
    }

    fn get_values(&self) -> Values {
        (*self.values).clone()
    }

    fn new_context(&self, ctx: &Context) -> Context {
        ctx.with_entry(Arc::new(self.clone()))
    }
}
