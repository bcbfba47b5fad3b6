//! JSON record formatter
//!
//! Renders one [`Record`] per line. The built-in keys can be renamed through
//! a [`FieldMap`]; [`JsonFormatter::gelf`] applies the names the Graylog
//! pipeline expects.

use contextlog_domain::Record;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt::Write;

/// Timestamp pattern used by the GELF formatter (`DD.MM.YYYY HH:MM:SS`)
pub const GELF_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Built-in keys every record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Time,
    Level,
    Message,
    File,
    Func,
    /// Set only when the formatter itself failed
    LoggerError,
}

impl FieldKey {
    pub const ALL: [FieldKey; 6] = [
        FieldKey::Time,
        FieldKey::Level,
        FieldKey::Message,
        FieldKey::File,
        FieldKey::Func,
        FieldKey::LoggerError,
    ];

    /// Name used when the field map does not rename the key
    pub fn default_name(&self) -> &'static str {
        match self {
            FieldKey::Time => "time",
            FieldKey::Level => "level",
            FieldKey::Message => "msg",
            FieldKey::File => "file",
            FieldKey::Func => "func",
            FieldKey::LoggerError => "logger_error",
        }
    }
}

/// Renames for the built-in keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(HashMap<FieldKey, String>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename(mut self, key: FieldKey, name: impl Into<String>) -> Self {
        self.0.insert(key, name.into());
        self
    }

    pub fn resolve(&self, key: FieldKey) -> &str {
        self.0
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_name())
    }

    /// Key names of the GELF log schema
    pub fn gelf() -> Self {
        Self::new()
            .rename(FieldKey::File, "file")
            .rename(FieldKey::Func, "func")
            .rename(FieldKey::LoggerError, "logger_error")
            .rename(FieldKey::Time, "timestamp")
            .rename(FieldKey::Level, "level")
            .rename(FieldKey::Message, "message")
    }
}

/// Formats records as single-line JSON objects
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    pub timestamp_format: String,
    pub field_map: FieldMap,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self {
            timestamp_format: "%+".to_string(),
            field_map: FieldMap::default(),
        }
    }
}

impl JsonFormatter {
    /// Formatter producing the GELF record shape
    pub fn gelf() -> Self {
        Self {
            timestamp_format: GELF_TIMESTAMP_FORMAT.to_string(),
            field_map: FieldMap::gelf(),
        }
    }

    /// Render `record` as one newline-terminated JSON object.
    ///
    /// Formatting problems never fail the record: they are reported in the
    /// `logger_error` field instead.
    pub fn format(&self, record: &Record) -> Vec<u8> {
        let mut data: Map<String, Value> = record
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.prefix_field_clashes(&mut data);

        let mut timestamp = String::new();
        if let Err(e) = write!(timestamp, "{}", record.timestamp.format(&self.timestamp_format)) {
            timestamp = record.timestamp.to_rfc3339();
            data.insert(
                self.key(FieldKey::LoggerError),
                Value::String(format!(
                    "invalid timestamp format '{}': {e}",
                    self.timestamp_format
                )),
            );
        }

        data.insert(self.key(FieldKey::Time), Value::String(timestamp));
        data.insert(
            self.key(FieldKey::Level),
            Value::String(record.level.to_string()),
        );
        data.insert(
            self.key(FieldKey::Message),
            Value::String(record.message.clone()),
        );
        data.insert(
            self.key(FieldKey::File),
            Value::String(record.caller.file_line()),
        );
        if let Some(func) = record.caller.func {
            data.insert(self.key(FieldKey::Func), Value::String(func.to_string()));
        }

        match serde_json::to_vec(&data) {
            Ok(mut line) => {
                line.push(b'\n');
                line
            }
            Err(e) => self.fallback(record, &e),
        }
    }

    fn key(&self, key: FieldKey) -> String {
        self.field_map.resolve(key).to_string()
    }

    /// Move caller fields that collide with a built-in key to `fields.<key>`
    fn prefix_field_clashes(&self, data: &mut Map<String, Value>) {
        for key in FieldKey::ALL {
            let name = self.field_map.resolve(key);
            if let Some(value) = data.remove(name) {
                data.insert(format!("fields.{name}"), value);
            }
        }
    }

    fn fallback(&self, record: &Record, error: &serde_json::Error) -> Vec<u8> {
        let mut data = Map::new();
        data.insert(
            self.key(FieldKey::Time),
            Value::String(record.timestamp.to_rfc3339()),
        );
        data.insert(
            self.key(FieldKey::Level),
            Value::String(record.level.to_string()),
        );
        data.insert(
            self.key(FieldKey::Message),
            Value::String(record.message.clone()),
        );
        data.insert(
            self.key(FieldKey::LoggerError),
            Value::String(format!("failed to marshal fields to JSON: {error}")),
        );

        let mut line = Value::Object(data).to_string().into_bytes();
        line.push(b'\n');
        line
    }
}
