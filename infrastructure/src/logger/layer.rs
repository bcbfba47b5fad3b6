//! Bridge from `tracing` events into an [`Entry`]
//!
//! Lets code instrumented with `tracing` macros end up in the same JSON
//! stream as records emitted through the entry API.

use contextlog_application::Entry;
use contextlog_domain::{Caller, Level, Values};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Events from this crate are not forwarded, so the logger's own
/// diagnostics cannot feed back into it.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// A `tracing` layer that forwards events to an [`Entry`]
pub struct LoggerLayer {
    entry: Arc<dyn Entry>,
}

impl LoggerLayer {
    pub fn new(entry: Arc<dyn Entry>) -> Self {
        Self { entry }
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(OWN_TARGET) {
            return;
        }

        let level = match *metadata.level() {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG | tracing::Level::TRACE => Level::Debug,
        };
        if !self.entry.enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let spans: Vec<&str> = ctx
            .event_scope(event)
            .map(|scope| scope.from_root().map(|span| span.name()).collect())
            .unwrap_or_default();
        let message = if spans.is_empty() {
            visitor.message
        } else {
            format!("{}: {}", spans.join("::"), visitor.message)
        };

        let caller = Caller::new(
            metadata.file().unwrap_or("<unknown>"),
            metadata.line().unwrap_or(0),
            Some(metadata.target()),
        );

        if visitor.values.is_empty() {
            self.entry.log(level, &message, caller);
        } else {
            self.entry
                .with_values(visitor.values)
                .log(level, &message, caller);
        }
    }
}

/// Splits an event into its message and structured fields
#[derive(Default)]
struct FieldVisitor {
    message: String,
    values: Values,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.values.insert(field.name(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.insert(field, Value::from(value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.insert(field, Value::from(format!("{value:?}")));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}
