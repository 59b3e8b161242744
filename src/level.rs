//! Severity levels and the runtime-adjustable level threshold

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Log severity, ordered from least to most severe
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Verbose diagnostics, usually disabled in production
    Debug = 0,
    /// Normal operational events
    Info = 1,
    /// Recoverable problems worth a look
    Warn = 2,
    /// Failures that need attention
    Error = 3,
    /// Unrecoverable failure; the process exits after the entry is written
    Fatal = 4,
    /// Programmer error; the caller unwinds after the entry is written
    Panic = 5,
}

impl Level {
    /// All levels, least severe first
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
        Level::Panic,
    ];

    /// Position in [`Level::ALL`]
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Upper-case name, as written by the capital level encoder
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Panic => "PANIC",
        }
    }

    /// Lower-case name
    pub const fn as_lower_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Panic => "panic",
        }
    }

    /// ANSI color code used by the color level encoders
    pub(crate) const fn color(self) -> u8 {
        match self {
            Level::Debug => 35,
            Level::Info => 34,
            Level::Warn => 33,
            Level::Error | Level::Fatal | Level::Panic => 31,
        }
    }

    const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Level::Debug),
            1 => Some(Level::Info),
            2 => Some(Level::Warn),
            3 => Some(Level::Error),
            4 => Some(Level::Fatal),
            5 => Some(Level::Panic),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name a level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized level: {0:?}")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            "panic" => Ok(Level::Panic),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Minimum level shared between a logger and everything derived from it.
///
/// Cloning shares the underlying cell, so [`AtomicLevel::set`] on any clone is
/// seen by all of them.
#[derive(Debug, Clone)]
pub struct AtomicLevel {
    inner: Arc<AtomicU8>,
}

impl AtomicLevel {
    /// Create a level cell starting at `level`
    pub fn new(level: Level) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(level as u8)),
        }
    }

    /// Current minimum level
    #[inline]
    pub fn level(&self) -> Level {
        Level::from_u8(self.inner.load(Ordering::Relaxed)).unwrap_or(Level::Debug)
    }

    /// Change the minimum level
    pub fn set(&self, level: Level) {
        self.inner.store(level as u8, Ordering::Relaxed);
    }

    /// Whether entries at `level` pass the threshold
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }
}

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}
