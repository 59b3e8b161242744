//! Process-wide logger
//!
//! The global logger lives in an [`ArcSwap`], so [`initialize`] replaces it
//! atomically: a call in flight on another thread finishes on the logger it
//! loaded, and every later call sees the new one. Nothing is merged between the
//! old and new configuration.
//!
//! Until the first successful initialization the global logger is the
//! development default from [`default_logger`], so logging before `initialize`
//! is safe.

use crate::config::LoggingConfig;
use crate::error::BuildError;
use crate::logger::{Log, Logger};
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

static GLOBAL: Lazy<ArcSwap<Logger>> = Lazy::new(|| ArcSwap::from_pointee(default_logger()));

/// Configure the global logger for `environment`.
///
/// `"production"` and `"prod"` select the production preset, anything else the
/// development preset.
///
/// # Panics
///
/// Panics if the logger cannot be built; a process cannot run safely without
/// one. Use [`try_initialize`] to handle the error instead.
pub fn initialize(environment: &str) {
    if let Err(err) = try_initialize(environment) {
        panic!("failed to build {environment:?} logger: {err}");
    }
}

/// Configure the global logger for `environment`, returning build failures
pub fn try_initialize(environment: &str) -> Result<(), BuildError> {
    initialize_with(&LoggingConfig::resolve(environment))
}

/// Build `config` and install it as the global logger
pub fn initialize_with(config: &LoggingConfig) -> Result<(), BuildError> {
    let logger = config.build()?;
    replace_global(logger);
    tracing::debug!(level = %config.level, development = config.development, "global logger replaced");
    Ok(())
}

/// Install `logger` as the global logger, returning the previous one
pub fn replace_global(logger: Logger) -> Arc<Logger> {
    GLOBAL.swap(Arc::new(logger))
}

/// Snapshot of the current global logger, for injecting into collaborators
pub fn global() -> Arc<Logger> {
    GLOBAL.load_full()
}

/// A fresh development logger: Debug level, console encoding, unsampled,
/// stack traces off, writing to stderr. The global logger is not touched.
///
/// # Panics
///
/// Panics if the logger cannot be built.
pub fn default_logger() -> Logger {
    LoggingConfig::development()
        .build()
        .unwrap_or_else(|err| panic!("failed to build default logger: {err}"))
}

macro_rules! global_level_fns {
    ($plain:ident, $formatted:ident, $structured:ident, $name:literal) => {
        #[doc = concat!("Plain ", $name, " entry on the global logger")]
        #[track_caller]
        pub fn $plain(args: &[&dyn fmt::Display]) {
            GLOBAL.load().$plain(args)
        }

        #[doc = concat!("Formatted ", $name, " entry on the global logger")]
        #[track_caller]
        pub fn $formatted(args: fmt::Arguments<'_>) {
            GLOBAL.load().$formatted(args)
        }

        #[doc = concat!("Structured ", $name, " entry on the global logger")]
        #[track_caller]
        pub fn $structured(message: &str, key_values: &[Value]) {
            GLOBAL.load().$structured(message, key_values)
        }
    };
}

macro_rules! global_terminal_fns {
    ($plain:ident, $formatted:ident, $structured:ident, $name:literal) => {
        #[doc = concat!("Plain ", $name, " entry on the global logger")]
        #[track_caller]
        pub fn $plain(args: &[&dyn fmt::Display]) -> ! {
            global().$plain(args)
        }

        #[doc = concat!("Formatted ", $name, " entry on the global logger")]
        #[track_caller]
        pub fn $formatted(args: fmt::Arguments<'_>) -> ! {
            global().$formatted(args)
        }

        #[doc = concat!("Structured ", $name, " entry on the global logger")]
        #[track_caller]
        pub fn $structured(message: &str, key_values: &[Value]) -> ! {
            global().$structured(message, key_values)
        }
    };
}

global_level_fns!(debug, debugf, debugw, "debug");
global_level_fns!(info, infof, infow, "info");
global_level_fns!(warn, warnf, warnw, "warn");
global_level_fns!(error, errorf, errorw, "error");
global_terminal_fns!(fatal, fatalf, fatalw, "fatal");
global_terminal_fns!(panic, panicf, panicw, "panic");
