//! Entry encoding
//!
//! Entries travel through `tracing` as events whose fields carry the severity,
//! logger name, caller, structured fields and stack trace. [`EntryFormat`] reads
//! them back and renders a console or JSON line using the configured keys.

use crate::config::{EncoderConfig, Encoding};
use crate::level::Level;
use chrono::{DateTime, Local};
use serde_json::{Map, Value};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

pub(crate) const SEVERITY_FIELD: &str = "sazabi.severity";
pub(crate) const LOGGER_FIELD: &str = "sazabi.logger";
pub(crate) const CALLER_FIELD: &str = "sazabi.caller";
pub(crate) const FIELDS_FIELD: &str = "sazabi.fields";
pub(crate) const STACKTRACE_FIELD: &str = "sazabi.stacktrace";

/// One decoded log entry
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) time: DateTime<Local>,
    pub(crate) level: Level,
    pub(crate) logger: Option<String>,
    /// `file:line`, unshortened
    pub(crate) caller: Option<(String, u32)>,
    pub(crate) message: String,
    pub(crate) fields: Map<String, Value>,
    pub(crate) stacktrace: Option<String>,
}

#[derive(Default)]
struct EntryVisitor {
    message: String,
    severity: Option<Level>,
    logger: Option<String>,
    caller: Option<(String, u32)>,
    fields: Map<String, Value>,
    stacktrace: Option<String>,
}

impl EntryVisitor {
    fn record_value(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            SEVERITY_FIELD => self.severity = value.parse().ok(),
            LOGGER_FIELD => self.logger = Some(value.to_string()),
            CALLER_FIELD => self.caller = split_caller(value),
            STACKTRACE_FIELD => self.stacktrace = Some(value.to_string()),
            FIELDS_FIELD => match serde_json::from_str::<Map<String, Value>>(value) {
                Ok(fields) => self.fields.extend(fields),
                Err(_) => {
                    self.record_value(field, Value::String(value.to_string()));
                }
            },
            _ => self.record_value(field, Value::String(value.to_string())),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.record_value(field, Value::String(format!("{value:?}")));
        }
    }
}

fn split_caller(caller: &str) -> Option<(String, u32)> {
    let (file, line) = caller.rsplit_once(':')?;
    Some((file.to_string(), line.parse().ok()?))
}

impl Entry {
    /// Decode an event emitted by a logger. Every logger event is recorded at
    /// the ERROR callsite, so a missing severity field means Error.
    pub(crate) fn from_event(event: &Event<'_>) -> Self {
        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);

        Self {
            time: Local::now(),
            level: visitor.severity.unwrap_or(Level::Error),
            logger: visitor.logger,
            caller: visitor.caller,
            message: visitor.message,
            fields: visitor.fields,
            stacktrace: visitor.stacktrace,
        }
    }
}

/// Renders entries for a `tracing_subscriber::fmt` layer
#[derive(Debug, Clone)]
pub(crate) struct EntryFormat {
    encoding: Encoding,
    config: EncoderConfig,
}

impl EntryFormat {
    pub(crate) fn new(encoding: Encoding, config: EncoderConfig) -> Self {
        Self { encoding, config }
    }

    pub(crate) fn encode(&self, entry: &Entry, out: &mut impl fmt::Write) -> fmt::Result {
        match self.encoding {
            Encoding::Console => self.encode_console(entry, out),
            Encoding::Json => self.encode_json(entry, out),
        }
    }

    /// Tab-separated elements, fields as a JSON object, stack trace on its own lines
    fn encode_console(&self, entry: &Entry, out: &mut impl fmt::Write) -> fmt::Result {
        let config = &self.config;
        let mut elements: Vec<String> = Vec::with_capacity(6);

        if !config.time_key.is_empty() {
            elements.push(config.time_encoder.encode_text(&entry.time));
        }
        if !config.level_key.is_empty() {
            elements.push(config.level_encoder.encode(entry.level).into_owned());
        }
        if !config.name_key.is_empty() {
            if let Some(logger) = &entry.logger {
                elements.push(logger.clone());
            }
        }
        if !config.caller_key.is_empty() {
            if let Some((file, line)) = &entry.caller {
                elements.push(config.caller_encoder.encode(file, *line));
            }
        }
        if !config.message_key.is_empty() {
            elements.push(entry.message.clone());
        }
        if !entry.fields.is_empty() {
            elements.push(Value::Object(entry.fields.clone()).to_string());
        }

        out.write_str(&elements.join("\t"))?;
        if let Some(stacktrace) = &entry.stacktrace {
            if !config.stacktrace_key.is_empty() {
                out.write_char('\n')?;
                out.write_str(stacktrace)?;
            }
        }
        out.write_str(&config.line_ending)
    }

    /// One JSON object. Keys are written in element order and user fields are
    /// written as given, so a field may repeat an element key.
    fn encode_json(&self, entry: &Entry, out: &mut impl fmt::Write) -> fmt::Result {
        let config = &self.config;
        let mut object = JsonObject::new(out)?;

        if !config.level_key.is_empty() {
            object.entry(
                &config.level_key,
                &Value::String(config.level_encoder.encode(entry.level).into_owned()),
            )?;
        }
        if !config.time_key.is_empty() {
            object.entry(&config.time_key, &config.time_encoder.encode(&entry.time))?;
        }
        if !config.name_key.is_empty() {
            if let Some(logger) = &entry.logger {
                object.entry(&config.name_key, &Value::String(logger.clone()))?;
            }
        }
        if !config.caller_key.is_empty() {
            if let Some((file, line)) = &entry.caller {
                let caller = config.caller_encoder.encode(file, *line);
                object.entry(&config.caller_key, &Value::String(caller))?;
            }
        }
        if !config.message_key.is_empty() {
            object.entry(&config.message_key, &Value::String(entry.message.clone()))?;
        }
        for (key, value) in &entry.fields {
            object.entry(key, value)?;
        }
        if !config.stacktrace_key.is_empty() {
            if let Some(stacktrace) = &entry.stacktrace {
                object.entry(&config.stacktrace_key, &Value::String(stacktrace.clone()))?;
            }
        }

        object.finish()?;
        out.write_str(&config.line_ending)
    }
}

/// Streams `"key":value` pairs, allowing duplicate keys
struct JsonObject<'a, W: fmt::Write> {
    out: &'a mut W,
    first: bool,
}

impl<'a, W: fmt::Write> JsonObject<'a, W> {
    fn new(out: &'a mut W) -> Result<Self, fmt::Error> {
        out.write_char('{')?;
        Ok(Self { out, first: true })
    }

    fn entry(&mut self, key: &str, value: &Value) -> fmt::Result {
        if !self.first {
            self.out.write_char(',')?;
        }
        self.first = false;
        write!(self.out, "{}:{}", Value::String(key.to_string()), value)
    }

    fn finish(self) -> fmt::Result {
        self.out.write_char('}')
    }
}

impl<S, N> FormatEvent<S, N> for EntryFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let entry = Entry::from_event(event);
        self.encode(&entry, &mut writer)
    }
}
