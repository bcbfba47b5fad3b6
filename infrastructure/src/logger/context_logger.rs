//! Root logger and its builder

use super::entry::{Core, ExitFn, LogEntry};
use super::error::{LoggerError, Result};
use super::formatter::JsonFormatter;
use super::layer::LoggerLayer;
use super::output::Output;
use crate::config::LoggerConfig;
use contextlog_application::{Context, Entry, Hook, HookError, Logger, ShutdownSender};
use contextlog_domain::{Caller, Level, Values};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// JSON logger writing GELF-shaped records to standard error and files.
///
/// The root logger carries no fields of its own; [`Entry::with_values`]
/// derives entries that do. Every entry shares the logger's level, output,
/// hooks and shutdown channel.
#[derive(Clone)]
pub struct ContextLogger {
    root: LogEntry,
}

impl ContextLogger {
    pub fn builder() -> ContextLoggerBuilder {
        ContextLoggerBuilder::default()
    }

    /// Build a logger writing to standard error plus every path in `outputs`.
    ///
    /// Fails if `shutdown` is `None`, if `level` is not a level name, or if
    /// any output cannot be opened.
    pub fn new<I, P>(shutdown: Option<ShutdownSender>, level: &str, outputs: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut builder = Self::builder().level(level).outputs(outputs);
        if let Some(shutdown) = shutdown {
            builder = builder.shutdown(shutdown);
        }
        builder.build()
    }

    pub fn from_config(config: &LoggerConfig, shutdown: ShutdownSender) -> Result<Self> {
        Self::builder()
            .level(&config.level)
            .outputs(config.outputs.iter().cloned())
            .shutdown(shutdown)
            .build()
    }

    pub fn level(&self) -> Level {
        self.root.level()
    }

    /// A `tracing` layer that forwards events into this logger
    pub fn layer(&self) -> LoggerLayer {
        LoggerLayer::new(Arc::new(self.root.clone()))
    }
}

impl fmt::Debug for ContextLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextLogger")
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

impl Entry for ContextLogger {
    fn enabled(&self, level: Level) -> bool {
        self.root.enabled(level)
    }

    fn log(&self, level: Level, message: &dyn fmt::Display, caller: Caller) {
        self.root.log(level, message, caller);
    }

    fn exit(&self, code: i32) {
        self.root.exit(code);
    }

    fn graceful_fatal(&self, ctx: &Context) {
        self.root.graceful_fatal(ctx);
    }

    fn writer(&self) -> Box<dyn io::Write + Send> {
        self.root.writer()
    }

    fn with_values(&self, values: Values) -> Arc<dyn Entry> {
        self.root.with_values(values)
    }

    /// Always empty: only derived entries accumulate fields
    fn get_values(&self) -> Values {
        Values::new()
    }

    /// Stores a fresh field-less entry, never the logger itself
    fn new_context(&self, ctx: &Context) -> Context {
        ctx.with_entry(Arc::new(self.root.fresh()))
    }
}

impl Logger for ContextLogger {
    fn add_hooks(&self, hooks: Vec<Arc<dyn Hook>>) -> std::result::Result<(), HookError> {
        let mut registry = self
            .root
            .core()
            .hooks
            .write()
            .map_err(|_| HookError::Poisoned)?;
        registry.extend(hooks);
        Ok(())
    }
}

/// Builder for [`ContextLogger`]
pub struct ContextLoggerBuilder {
    shutdown: Option<ShutdownSender>,
    level: String,
    outputs: Vec<PathBuf>,
    primary: Option<BoxMakeWriter>,
    formatter: JsonFormatter,
    exit: ExitFn,
}

impl Default for ContextLoggerBuilder {
    fn default() -> Self {
        Self {
            shutdown: None,
            level: Level::default().to_string(),
            outputs: Vec::new(),
            primary: None,
            formatter: JsonFormatter::gelf(),
            exit: Arc::new(|code| std::process::exit(code)),
        }
    }
}

impl ContextLoggerBuilder {
    /// Channel graceful-fatal requests are sent on (required)
    pub fn shutdown(mut self, shutdown: ShutdownSender) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Threshold level name, e.g. `"debug"` or `"warning"`
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Additional file the records are appended to
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.outputs.push(path.into());
        self
    }

    pub fn outputs<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.outputs.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Replace standard error as the primary destination
    pub fn primary_writer<M>(mut self, writer: M) -> Self
    where
        M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.primary = Some(BoxMakeWriter::new(writer));
        self
    }

    pub fn formatter(mut self, formatter: JsonFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Replace `std::process::exit` as the action taken after `fatal`
    pub fn exit_func(mut self, exit: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.exit = Arc::new(exit);
        self
    }

    /// Validate the configuration and open the outputs.
    ///
    /// Nothing touches the filesystem unless the shutdown channel and level
    /// are valid.
    pub fn build(self) -> Result<ContextLogger> {
        let shutdown = self.shutdown.ok_or(LoggerError::MissingShutdownChannel)?;
        let level = self
            .level
            .parse::<Level>()
            .map_err(|source| LoggerError::InvalidLevel {
                level: self.level.clone(),
                source,
            })?;
        let primary = self
            .primary
            .unwrap_or_else(|| BoxMakeWriter::new(io::stderr));
        let output = Output::open(primary, &self.outputs)?;

        let core = Core {
            level,
            formatter: self.formatter,
            output,
            hooks: RwLock::new(Vec::new()),
            shutdown,
            exit: self.exit,
        };

        Ok(ContextLogger {
            root: LogEntry::root(Arc::new(core)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::test_support::SharedBuffer;
    use chrono::NaiveDateTime;
    use contextlog_application::{BoxError, EntryExt, shutdown_channel};
    use contextlog_domain::Record;
    use serde_json::json;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    fn capture(level: &str) -> (ContextLogger, SharedBuffer, Arc<Mutex<Vec<i32>>>) {
        let buffer = SharedBuffer::default();
        let exits = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&exits);
        let (tx, _rx) = shutdown_channel();

        let logger = ContextLogger::builder()
            .level(level)
            .shutdown(tx)
            .primary_writer(buffer.clone())
            .exit_func(move |code| recorded.lock().unwrap().push(code))
            .build()
            .unwrap();
        (logger, buffer, exits)
    }

    fn emit_all(entry: &dyn Entry) {
        entry.debug("d");
        entry.info("i");
        entry.warning("w");
        entry.error("e");
        entry.fatal("f");
        let _ = catch_unwind(AssertUnwindSafe(|| -> () { entry.panic("p") }));
    }

    #[test]
    fn test_only_levels_at_or_above_threshold_are_emitted() {
        for threshold in Level::ALL {
            let (logger, buffer, exits) = capture(threshold.as_str());
            emit_all(&logger);

            let emitted: Vec<String> = buffer
                .records()
                .iter()
                .map(|r| r["level"].as_str().unwrap().to_string())
                .collect();
            let expected: Vec<String> = Level::ALL
                .iter()
                .filter(|l| **l >= threshold)
                .map(|l| l.to_string())
                .collect();

            assert_eq!(emitted, expected, "threshold {threshold}");
            assert_eq!(*exits.lock().unwrap(), vec![1], "fatal always exits");
        }
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let (tx, _rx) = shutdown_channel();
        let err = ContextLogger::new(Some(tx), "verbose", Vec::<PathBuf>::new()).unwrap_err();

        assert!(matches!(err, LoggerError::InvalidLevel { .. }));
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_missing_shutdown_channel_fails_before_file_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-created.log");

        let err = ContextLogger::new(None, "info", [&path]).unwrap_err();

        assert!(matches!(err, LoggerError::MissingShutdownChannel));
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_level_fails_before_file_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-created.log");
        let (tx, _rx) = shutdown_channel();

        assert!(ContextLogger::new(Some(tx), "loud", [&path]).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_records_reach_every_output() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..3).map(|i| dir.path().join(format!("{i}.log"))).collect();
        std::fs::write(&paths[0], "{\"message\":\"earlier\"}\n").unwrap();
        let buffer = SharedBuffer::default();
        let (tx, _rx) = shutdown_channel();

        let logger = ContextLogger::builder()
            .level("debug")
            .outputs(paths.clone())
            .shutdown(tx)
            .primary_writer(buffer.clone())
            .build()
            .unwrap();
        logger.info("fan out");

        assert_eq!(buffer.records()[0]["message"], "fan out");
        for path in &paths {
            let content = std::fs::read_to_string(path).unwrap();
            let last: serde_json::Value =
                serde_json::from_str(content.lines().last().unwrap()).unwrap();
            assert_eq!(last["message"], "fan out");
        }
        let first = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(first.lines().count(), 2);
        assert!(first.starts_with("{\"message\":\"earlier\"}"));
    }

    #[test]
    fn test_unopenable_output_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("no-such-dir").join("app.log");
        let (tx, _rx) = shutdown_channel();

        let err = ContextLogger::new(Some(tx), "info", [&bad]).unwrap_err();
        assert!(matches!(err, LoggerError::OpenOutput { ref path, .. } if *path == bad));
    }

    #[test]
    fn test_record_shape() {
        let (logger, buffer, _) = capture("debug");
        let entry = logger.with_values(Values::from([("request_id", "r-42")]));

        let line = line!() + 1;
        entry.warning("slow response");

        let record = &buffer.records()[0];
        assert_eq!(record["level"], "warning");
        assert_eq!(record["message"], "slow response");
        assert_eq!(record["request_id"], "r-42");
        let file = record["file"].as_str().unwrap();
        assert!(file.ends_with(&format!("context_logger.rs:{line}")), "{file}");
        assert!(record.get("func").is_none());
        assert!(record.get("logger_error").is_none());
        let timestamp = record["timestamp"].as_str().unwrap();
        assert!(NaiveDateTime::parse_from_str(timestamp, "%d.%m.%Y %H:%M:%S").is_ok());
    }

    #[test]
    fn test_emit_macro_reports_func() {
        let (logger, buffer, _) = capture("info");
        contextlog_application::emit!(logger, Level::Info, "{} jobs queued", 3);

        let record = &buffer.records()[0];
        assert_eq!(record["message"], "3 jobs queued");
        assert_eq!(record["func"], module_path!());
    }

    #[test]
    fn test_with_values_chains_without_mutation() {
        let (logger, _, _) = capture("info");

        let first = logger.with_values(Values::from([("a", 1)]));
        let second = first.with_values(Values::from([("b", 2)]));

        assert_eq!(second.get_values(), Values::from([("a", 1), ("b", 2)]));
        assert_eq!(first.get_values(), Values::from([("a", 1)]));
        assert!(logger.get_values().is_empty());
    }

    #[test]
    fn test_with_values_later_keys_win() {
        let (logger, buffer, _) = capture("info");
        let entry = logger
            .with_values(Values::from([("stage", "parse")]))
            .with_values(Values::from([("stage", "render")]));
        entry.info("done");

        assert_eq!(buffer.records()[0]["stage"], "render");
    }

    #[test]
    fn test_context_round_trip() {
        let (logger, _, _) = capture("info");
        let entry = logger.with_values(Values::from([("user", json!("bob"))]));

        let ctx = entry.new_context(&Context::background());
        let stored = entry.from_context(&ctx).unwrap();
        assert_eq!(stored.get_values(), entry.get_values());

        assert!(logger.from_context(&Context::background()).is_none());
    }

    #[test]
    fn test_logger_stores_fieldless_entry_in_context() {
        let (logger, buffer, _) = capture("info");

        let ctx = logger.new_context(&Context::background());
        let stored = logger.from_context(&ctx).unwrap();
        assert!(stored.get_values().is_empty());

        stored.info("through context");
        assert_eq!(buffer.records()[0]["message"], "through context");
    }

    struct FieldHook {
        levels: Vec<Level>,
        fired: Arc<AtomicUsize>,
    }

    impl Hook for FieldHook {
        fn levels(&self) -> &[Level] {
            &self.levels
        }

        fn fire(&self, record: &mut Record) -> std::result::Result<(), BoxError> {
            self.fired.fetch_add(1, Ordering::SeqCst);
            record.values.insert("host", "web-1");
            Ok(())
        }
    }

    struct FailingHook;

    impl Hook for FailingHook {
        fn fire(&self, _record: &mut Record) -> std::result::Result<(), BoxError> {
            Err("collector unreachable".into())
        }
    }

    #[test]
    fn test_hooks_fire_for_subscribed_levels() {
        let (logger, buffer, _) = capture("debug");
        let fired = Arc::new(AtomicUsize::new(0));
        logger
            .add_hooks(vec![Arc::new(FieldHook {
                levels: vec![Level::Error],
                fired: Arc::clone(&fired),
            })])
            .unwrap();

        logger.info("not hooked");
        logger.error("hooked");

        let records = buffer.records();
        assert!(records[0].get("host").is_none());
        assert_eq!(records[1]["host"], "web-1");
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_hook_does_not_stop_emission() {
        let (logger, buffer, _) = capture("info");
        logger.add_hooks(vec![Arc::new(FailingHook)]).unwrap();

        logger.info("still written");
        assert_eq!(buffer.records()[0]["message"], "still written");
    }

    #[test]
    fn test_concurrent_hook_registration() {
        let (logger, _, _) = capture("info");
        let fired = Arc::new(AtomicUsize::new(0));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let logger = &logger;
                let fired = Arc::clone(&fired);
                scope.spawn(move || {
                    logger
                        .add_hooks(vec![Arc::new(FieldHook {
                            levels: Level::ALL.to_vec(),
                            fired,
                        })])
                        .unwrap();
                });
            }
        });

        logger.info("count hooks");
        assert_eq!(fired.load(Ordering::SeqCst), 8);
    }

    /// Logs and registers hooks from inside `fire`
    struct ReentrantHook {
        logger: ContextLogger,
    }

    impl Hook for ReentrantHook {
        fn levels(&self) -> &[Level] {
            &[Level::Error]
        }

        fn fire(&self, _record: &mut Record) -> std::result::Result<(), BoxError> {
            self.logger.add_hooks(vec![])?;
            self.logger.info("from inside a hook");
            Ok(())
        }
    }

    #[test]
    fn test_hook_may_log_and_register_hooks() {
        let (logger, buffer, _) = capture("info");
        logger
            .add_hooks(vec![Arc::new(ReentrantHook {
                logger: logger.clone(),
            })])
            .unwrap();

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let emitting = logger.clone();
        std::thread::spawn(move || {
            emitting.error("outer");
            let _ = done_tx.send(());
        });

        done_rx
            .recv_timeout(Duration::from_secs(3))
            .expect("emission from a re-entrant hook must not deadlock");
        let messages: Vec<_> = buffer
            .records()
            .iter()
            .map(|r| r["message"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(messages, vec!["from inside a hook", "outer"]);
    }

    #[test]
    fn test_concurrent_emission_keeps_lines_whole() {
        const THREADS: usize = 8;
        const RECORDS: usize = 200;
        let (logger, buffer, _) = capture("info");

        std::thread::scope(|scope| {
            for t in 0..THREADS {
                let entry = logger.with_values(Values::from([("thread", t)]));
                scope.spawn(move || {
                    for i in 0..RECORDS {
                        entry.info(format_args!("record {i} {}", "x".repeat(256)));
                    }
                });
            }
        });

        let contents = buffer.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), THREADS * RECORDS);
        for line in lines {
            let record: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(record.is_object());
            assert_eq!(record["level"], "info");
        }
    }

    #[tokio::test]
    async fn test_graceful_fatal_delivers_context() {
        let (tx, mut rx) = shutdown_channel();
        let logger = ContextLogger::builder()
            .shutdown(tx)
            .primary_writer(SharedBuffer::default())
            .build()
            .unwrap();
        let entry = logger.with_values(Values::from([("job", "sync")]));

        entry.graceful_fatal(&entry.new_context(&Context::background()));

        let ctx = rx.recv().await.unwrap();
        assert_eq!(ctx.entry().unwrap().get_values(), entry.get_values());
    }

    #[test]
    fn test_graceful_fatal_never_blocks() {
        let (tx, mut rx) = shutdown_channel();
        let logger = ContextLogger::builder()
            .shutdown(tx)
            .primary_writer(SharedBuffer::default())
            .build()
            .unwrap();

        let started = Instant::now();
        for _ in 0..3 {
            logger.graceful_fatal(&Context::background());
        }
        assert!(started.elapsed() < Duration::from_secs(1));

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_graceful_fatal_on_closed_channel_is_silent() {
        let (tx, rx) = shutdown_channel();
        drop(rx);
        let logger = ContextLogger::builder()
            .shutdown(tx)
            .primary_writer(SharedBuffer::default())
            .build()
            .unwrap();

        logger.graceful_fatal(&Context::background());
    }

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggerConfig {
            level: "warning".to_string(),
            outputs: vec![dir.path().join("app.log")],
        };
        let (tx, _rx) = shutdown_channel();

        let logger = ContextLogger::from_config(&config, tx).unwrap();
        assert_eq!(logger.level(), Level::Warning);
        assert!(config.outputs[0].exists());
    }
}
