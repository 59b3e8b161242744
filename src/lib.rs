//! sazabi: environment-driven structured logging facade
//!
//! This library provides:
//! - An environment resolver mapping `"production"`/`"prod"` and everything else
//!   onto production and development logging configurations
//! - Loggers with level filtering, burst + rate sampling, console and JSON
//!   encodings and file or standard-stream sinks, built on `tracing`
//! - A process-wide logger with eighteen entry points: six severities
//!   (debug, info, warn, error, fatal, panic) in plain, formatted and
//!   structured shapes, as functions and as variadic macros
//! - Independent loggers for dependency injection through the [`Log`] trait
//!
//! ```no_run
//! sazabi::initialize("production");
//!
//! sazabi::info!("listening on", 8080);
//! sazabi::debugf!("retry {} of {}", 2, 5);
//! sazabi::infow!("login", "user", "alice");
//! sazabi::error!("disk full");
//! ```

pub mod config;
mod encoder;
mod error;
mod fields;
mod global;
mod level;
mod logger;
mod sampling;
pub mod sink;

pub mod cli;

pub use config::{Encoding, LoggingConfig, SamplingConfig};
pub use error::BuildError;
pub use fields::value;
pub use global::{
    debug, debugf, debugw, default_logger, error, errorf, errorw, fatal, fatalf, fatalw, global,
    info, infof, infow, initialize, initialize_with, panic, panicf, panicw, replace_global,
    try_initialize, warn, warnf, warnw,
};
pub use level::{AtomicLevel, Level, ParseLevelError};
pub use logger::{FatalHook, Log, Logger};
pub use serde_json::Value;
pub use sink::{SharedBuffer, Sink};

mod macros;
