//! Loggers and the six-severity, three-shape logging capability
//!
//! Every severity comes in three argument shapes:
//! - plain (`info`): display values joined by single spaces
//! - formatted (`infof`): `format_args!` output
//! - structured (`infow`): a message plus alternating key/value arguments
//!
//! A [`Logger`] owns its own `tracing` dispatcher, so entries never reach (or
//! depend on) the host application's global subscriber.

use crate::config::LoggingConfig;
use crate::encoder::EntryFormat;
use crate::error::BuildError;
use crate::fields::{self, Malformed};
use crate::level::{AtomicLevel, Level};
use crate::sampling::Sampler;
use crate::sink::{Sink, SinkWriterFactory, Sinks};
use serde_json::{Map, Value};
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;

/// What a fatal entry does after it has been written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FatalHook {
    /// Flush sinks and exit the process with status 1
    #[default]
    Exit,
    /// Flush sinks and unwind with the entry's message
    Panic,
}

fn join(args: &[&dyn fmt::Display]) -> String {
    let mut message = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            message.push(' ');
        }
        // Writing into a String cannot fail.
        let _ = fmt::write(&mut message, format_args!("{arg}"));
    }
    message
}

macro_rules! level_methods {
    ($level:expr, $plain:ident, $formatted:ident, $structured:ident) => {
        #[track_caller]
        fn $plain(&self, args: &[&dyn fmt::Display]) {
            if self.enabled($level) {
                self.write_entry($level, &join(args), &[], Location::caller());
            }
        }

        #[track_caller]
        fn $formatted(&self, args: fmt::Arguments<'_>) {
            if self.enabled($level) {
                self.write_entry($level, &args.to_string(), &[], Location::caller());
            }
        }

        #[track_caller]
        fn $structured(&self, message: &str, key_values: &[Value]) {
            if self.enabled($level) {
                self.write_entry($level, message, key_values, Location::caller());
            }
        }
    };
}

macro_rules! terminal_methods {
    ($level:expr, $plain:ident, $formatted:ident, $structured:ident) => {
        #[track_caller]
        fn $plain(&self, args: &[&dyn fmt::Display]) -> ! {
            let message = join(args);
            self.write_entry($level, &message, &[], Location::caller());
            self.terminate($level, message)
        }

        #[track_caller]
        fn $formatted(&self, args: fmt::Arguments<'_>) -> ! {
            let message = args.to_string();
            self.write_entry($level, &message, &[], Location::caller());
            self.terminate($level, message)
        }

        #[track_caller]
        fn $structured(&self, message: &str, key_values: &[Value]) -> ! {
            self.write_entry($level, message, key_values, Location::caller());
            self.terminate($level, message.to_string())
        }
    };
}

/// The logging capability shared by [`Logger`] and anything standing in for it.
///
/// Implementors supply the three required methods; the eighteen level methods
/// are provided. Structured `key_values` alternate key and value; keys must be
/// JSON strings. A trailing key without a value, or pairs with a non-string
/// key, are left out of the entry and reported in an extra Error entry.
///
/// Fatal and panic methods write the entry and then call [`Log::terminate`],
/// which never returns. Use [`Log::log`] to record at those severities without
/// terminating.
pub trait Log: Send + Sync {
    /// Whether entries at `level` currently pass the threshold
    fn enabled(&self, level: Level) -> bool;

    /// Write one entry attributed to `caller`. Never terminates.
    fn write_entry(
        &self,
        level: Level,
        message: &str,
        key_values: &[Value],
        caller: &'static Location<'static>,
    );

    /// Post-write action for fatal and panic entries
    #[track_caller]
    fn terminate(&self, level: Level, message: String) -> !;

    /// Formatted entry at any severity, without termination
    #[track_caller]
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            self.write_entry(level, &args.to_string(), &[], Location::caller());
        }
    }

    /// Structured entry at any severity, without termination
    #[track_caller]
    fn logw(&self, level: Level, message: &str, key_values: &[Value]) {
        if self.enabled(level) {
            self.write_entry(level, message, key_values, Location::caller());
        }
    }

    level_methods!(Level::Debug, debug, debugf, debugw);
    level_methods!(Level::Info, info, infof, infow);
    level_methods!(Level::Warn, warn, warnf, warnw);
    level_methods!(Level::Error, error, errorf, errorw);
    terminal_methods!(Level::Fatal, fatal, fatalf, fatalw);
    terminal_methods!(Level::Panic, panic, panicf, panicw);
}

struct Core {
    dispatch: Dispatch,
    level: AtomicLevel,
    sampler: Option<Sampler>,
    sinks: Arc<Sinks>,
    add_caller: bool,
    stacktrace_level: Option<Level>,
}

/// A structured logger built from a [`LoggingConfig`].
///
/// Cloning is cheap; clones share sinks, level and sampling state. Loggers are
/// `Send + Sync` and may be used from any number of threads.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    name: Option<Arc<str>>,
    context: Arc<Map<String, Value>>,
    fatal_hook: FatalHook,
}

impl Logger {
    pub(crate) fn from_parts(
        config: &LoggingConfig,
        outputs: Vec<Sink>,
        errors: Vec<Sink>,
    ) -> Result<Self, BuildError> {
        let sinks = Arc::new(Sinks::new(outputs, errors));

        let layer = tracing_subscriber::fmt::layer()
            .event_format(EntryFormat::new(config.encoding, config.encoder.clone()))
            .with_writer(SinkWriterFactory::new(Arc::clone(&sinks)));
        let dispatch = Dispatch::new(tracing_subscriber::registry().with(layer));

        let core = Core {
            dispatch,
            level: AtomicLevel::new(config.level),
            sampler: config.sampling.map(Sampler::new),
            sinks,
            add_caller: !config.disable_caller,
            stacktrace_level: config.stacktrace_level(),
        };

        Ok(Self {
            core: Arc::new(core),
            name: None,
            context: Arc::new(config.initial_fields.clone()),
            fatal_hook: FatalHook::default(),
        })
    }

    /// Child logger whose name is this logger's name joined with `name` by a dot
    pub fn named(&self, name: &str) -> Logger {
        if name.is_empty() {
            return self.clone();
        }
        let name: Arc<str> = match &self.name {
            Some(parent) => format!("{parent}.{name}").into(),
            None => name.into(),
        };
        Logger {
            name: Some(name),
            ..self.clone()
        }
    }

    /// Child logger adding alternating key/value context to every entry
    #[track_caller]
    pub fn with(&self, key_values: &[Value]) -> Logger {
        let mut context = (*self.context).clone();
        let problems = fields::sweeten(key_values, &mut context);
        self.report(problems, Location::caller());
        Logger {
            context: Arc::new(context),
            ..self.clone()
        }
    }

    /// Child logger running `hook` after fatal entries
    pub fn with_fatal_hook(&self, hook: FatalHook) -> Logger {
        Logger {
            fatal_hook: hook,
            ..self.clone()
        }
    }

    /// Logger name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Current minimum level
    pub fn level(&self) -> Level {
        self.core.level.level()
    }

    /// Change the minimum level of this logger and everything sharing its core
    pub fn set_level(&self, level: Level) {
        self.core.level.set(level);
    }

    /// Handle on the shared minimum level
    pub fn atomic_level(&self) -> AtomicLevel {
        self.core.level.clone()
    }

    /// Flush every output sink
    pub fn sync(&self) {
        self.core.sinks.sync();
    }

    /// Level threshold, then sampling; terminal entries are never sampled away
    fn admit(&self, level: Level, message: &str) -> bool {
        if !self.core.level.enabled(level) {
            return false;
        }
        match &self.core.sampler {
            Some(sampler) if level < Level::Fatal => sampler.sample(level, message),
            _ => true,
        }
    }

    fn write(&self, level: Level, message: &str, key_values: &[Value], caller: &Location<'_>) {
        if !self.admit(level, message) {
            return;
        }

        let mut fields = (*self.context).clone();
        let problems = fields::sweeten(key_values, &mut fields);
        self.dispatch(level, message, &fields, caller);
        self.report(problems, caller);
    }

    fn report(&self, problems: Vec<Malformed>, caller: &Location<'_>) {
        for problem in problems {
            let message = problem.message();
            if !self.admit(Level::Error, message) {
                continue;
            }
            self.dispatch(Level::Error, message, &problem.into_fields(), caller);
        }
    }

    fn dispatch(&self, level: Level, message: &str, fields: &Map<String, Value>, caller: &Location<'_>) {
        let caller = self
            .core
            .add_caller
            .then(|| format!("{}:{}", caller.file(), caller.line()));
        let stacktrace = self
            .core
            .stacktrace_level
            .filter(|min| level >= *min)
            .map(|_| Backtrace::force_capture().to_string());
        let fields = if fields.is_empty() {
            None
        } else {
            serde_json::to_string(fields).ok()
        };

        let record = Record {
            level,
            message,
            logger: self.name.as_deref(),
            caller: caller.as_deref(),
            fields: fields.as_deref(),
            stacktrace: stacktrace.as_deref(),
        };
        tracing::dispatcher::with_default(&self.core.dispatch, || record.emit());
    }
}

impl Log for Logger {
    fn enabled(&self, level: Level) -> bool {
        self.core.level.enabled(level)
    }

    fn write_entry(
        &self,
        level: Level,
        message: &str,
        key_values: &[Value],
        caller: &'static Location<'static>,
    ) {
        self.write(level, message, key_values, caller);
    }

    #[track_caller]
    fn terminate(&self, level: Level, message: String) -> ! {
        self.sync();
        match (level, self.fatal_hook) {
            (Level::Fatal, FatalHook::Exit) => std::process::exit(1),
            _ => panic!("{message}"),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        crate::global::default_logger()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("sampler", &self.core.sampler)
            .field("fatal_hook", &self.fatal_hook)
            .finish_non_exhaustive()
    }
}

/// Entry as handed to `tracing`
struct Record<'a> {
    level: Level,
    message: &'a str,
    logger: Option<&'a str>,
    caller: Option<&'a str>,
    fields: Option<&'a str>,
    stacktrace: Option<&'a str>,
}

impl Record<'_> {
    /// One ERROR callsite for every severity, so static level filters never drop
    /// an entry; the severity travels in its own field.
    fn emit(&self) {
        tracing::event!(
            target: "sazabi",
            tracing::Level::ERROR,
            sazabi.severity = self.level.as_str(),
            sazabi.logger = self.logger,
            sazabi.caller = self.caller,
            sazabi.fields = self.fields,
            sazabi.stacktrace = self.stacktrace,
            "{}",
            self.message
        );
    }
}
