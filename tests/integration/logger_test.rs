//! Independent loggers handed to collaborators through the `Log` trait

use sazabi::{Encoding, FatalHook, Level, Log, Logger, LoggingConfig, SharedBuffer, Sink};

fn memory_logger(config: LoggingConfig) -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let logger = config
        .build_with_sinks(vec![Sink::memory(buffer.clone())], vec![])
        .unwrap();
    (logger, buffer)
}

struct Checkout<'a> {
    log: &'a dyn Log,
}

impl Checkout<'_> {
    fn pay(&self, cents: u64) {
        self.log
            .infow("payment accepted", &sazabi::fields!["cents", cents]);
    }
}

#[test]
fn test_injected_logger() {
    let (logger, buffer) = memory_logger(LoggingConfig::development());
    let checkout = Checkout { log: &logger };

    checkout.pay(1250);

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("payment accepted"));
    assert!(lines[0].ends_with(r#"{"cents":1250}"#));
}

#[test]
fn test_named_child_with_context() {
    let (logger, buffer) = memory_logger(LoggingConfig::production());
    let child = logger
        .named("http")
        .named("router")
        .with(&sazabi::fields!["request_id", "r-17"]);

    child.info(&[&"matched", &"/orders"]);

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("\thttp.router\t"));
    assert!(lines[0].contains("\tmatched /orders\t"));
    assert!(lines[0].ends_with(r#"{"request_id":"r-17"}"#));
}

#[test]
fn test_production_sampling_limits_repeats() {
    let (logger, buffer) = memory_logger(LoggingConfig::production());

    for _ in 0..1000 {
        logger.info(&[&"repeated"]);
    }

    // 100 per tick, then every 100th; a slow run may straddle a tick.
    let count = buffer.lines().len();
    assert!((109..=218).contains(&count), "got {count}");
}

#[test]
fn test_runtime_level_change() {
    let (logger, buffer) = memory_logger(LoggingConfig::development());
    let level = logger.atomic_level();

    level.set(Level::Error);
    logger.warn(&[&"hidden"]);
    logger.error(&[&"shown"]);
    level.set(Level::Debug);
    logger.debug(&[&"back"]);

    let lines = buffer.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("shown"));
    assert!(lines[1].ends_with("back"));
}

#[test]
fn test_fatal_hook_panic_is_catchable() {
    let (logger, buffer) = memory_logger(LoggingConfig::development());
    let logger = logger.with_fatal_hook(FatalHook::Panic);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        logger.fatalf(format_args!("lost {}", "quorum"));
    }));

    assert!(result.is_err());
    assert!(buffer.lines()[0].contains("\tFATAL\t"));
}

#[test]
fn test_log_at_terminal_level_returns() {
    let mut config = LoggingConfig::development();
    config.encoding = Encoding::Json;
    let (logger, buffer) = memory_logger(config);

    logger.logw(Level::Fatal, "recorded only", &[]);
    logger.log(Level::Panic, format_args!("also {}", "recorded"));

    let lines = buffer.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(r#""L":"FATAL""#));
    assert!(lines[1].contains(r#""L":"PANIC""#));
}
