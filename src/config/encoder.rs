//! Encoder keys and element formatting rules

use crate::level::Level;
use chrono::{DateTime, Offset, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How the level element is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelEncoder {
    /// `INFO`
    Capital,
    /// `INFO` wrapped in an ANSI color
    CapitalColor,
    /// `info`
    Lowercase,
    /// `info` wrapped in an ANSI color
    LowercaseColor,
}

impl LevelEncoder {
    pub fn encode(self, level: Level) -> Cow<'static, str> {
        match self {
            LevelEncoder::Capital => Cow::Borrowed(level.as_str()),
            LevelEncoder::Lowercase => Cow::Borrowed(level.as_lower_str()),
            LevelEncoder::CapitalColor => {
                Cow::Owned(format!("\x1b[{}m{}\x1b[0m", level.color(), level.as_str()))
            }
            LevelEncoder::LowercaseColor => Cow::Owned(format!(
                "\x1b[{}m{}\x1b[0m",
                level.color(),
                level.as_lower_str()
            )),
        }
    }
}

/// How the timestamp element is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEncoder {
    /// `2024-05-01T12:00:00.000+0200`, millisecond precision, `Z` for UTC
    Iso8601,
    /// `2024-05-01T12:00:00+02:00`
    Rfc3339,
    /// RFC 3339 with as much sub-second precision as needed
    Rfc3339Nano,
    /// Floating-point seconds since the Unix epoch
    Epoch,
    /// Floating-point milliseconds since the Unix epoch
    EpochMillis,
}

impl TimeEncoder {
    /// Encode as a JSON value; epoch encoders produce numbers
    pub fn encode<Tz>(self, time: &DateTime<Tz>) -> serde_json::Value
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        match self {
            TimeEncoder::Epoch => {
                serde_json::json!(time.timestamp_micros() as f64 / 1_000_000.0)
            }
            TimeEncoder::EpochMillis => {
                serde_json::json!(time.timestamp_micros() as f64 / 1_000.0)
            }
            _ => serde_json::Value::String(self.encode_text(time)),
        }
    }

    /// Encode as plain text, for console lines
    pub fn encode_text<Tz>(self, time: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        match self {
            TimeEncoder::Iso8601 => {
                let base = time.format("%Y-%m-%dT%H:%M:%S%.3f").to_string();
                if time.offset().fix().local_minus_utc() == 0 {
                    format!("{base}Z")
                } else {
                    format!("{base}{}", time.format("%z"))
                }
            }
            TimeEncoder::Rfc3339 => time.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimeEncoder::Rfc3339Nano => time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            TimeEncoder::Epoch => format!("{}", time.timestamp_micros() as f64 / 1_000_000.0),
            TimeEncoder::EpochMillis => format!("{}", time.timestamp_micros() as f64 / 1_000.0),
        }
    }
}

/// How the caller element is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerEncoder {
    /// Last directory and file name: `logging/global.rs:42`
    Short,
    /// Path as recorded by the compiler
    Full,
}

impl CallerEncoder {
    pub fn encode(self, file: &str, line: u32) -> String {
        match self {
            CallerEncoder::Full => format!("{file}:{line}"),
            CallerEncoder::Short => format!("{}:{line}", trim_path(file)),
        }
    }
}

/// Keep the final directory and the file name
fn trim_path(file: &str) -> &str {
    let is_sep = |c: char| c == '/' || c == '\\';
    let Some(last) = file.rfind(is_sep) else {
        return file;
    };
    match file[..last].rfind(is_sep) {
        Some(prev) => &file[prev + 1..],
        None => file,
    }
}

/// Output keys and formatting rules; an empty key omits that element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
    pub line_ending: String,
    pub level_encoder: LevelEncoder,
    pub time_encoder: TimeEncoder,
    pub caller_encoder: CallerEncoder,
}

impl EncoderConfig {
    /// `ts`, `level`, `logger`, `caller`, `msg`, `stacktrace`; capital levels,
    /// ISO-8601 time, short caller
    pub fn production() -> Self {
        Self {
            time_key: "ts".to_string(),
            level_key: "level".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            message_key: "msg".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            line_ending: "\n".to_string(),
            level_encoder: LevelEncoder::Capital,
            time_encoder: TimeEncoder::Iso8601,
            caller_encoder: CallerEncoder::Short,
        }
    }

    /// Single-letter keys with the same rules as production
    pub fn development() -> Self {
        Self {
            time_key: "T".to_string(),
            level_key: "L".to_string(),
            name_key: "N".to_string(),
            caller_key: "C".to_string(),
            message_key: "M".to_string(),
            stacktrace_key: "S".to_string(),
            ..Self::production()
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::production()
    }
}
