//! Benchmarks for the logging hot path

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sazabi::{Encoding, Log, Logger, LoggingConfig, SharedBuffer, Sink};

fn memory_logger(mut config: LoggingConfig, encoding: Encoding) -> (Logger, SharedBuffer) {
    config.encoding = encoding;
    let buffer = SharedBuffer::new();
    let logger = config
        .build_with_sinks(vec![Sink::memory(buffer.clone())], vec![])
        .expect("memory logger");
    (logger, buffer)
}

fn benchmark_filtered_entry(c: &mut Criterion) {
    let (logger, _buffer) = memory_logger(LoggingConfig::production(), Encoding::Console);

    c.bench_function("debug_filtered", |b| {
        b.iter(|| logger.debug(&[&black_box("ignored")]))
    });
}

fn benchmark_console_entry(c: &mut Criterion) {
    let mut config = LoggingConfig::development();
    config.disable_caller = true;
    let (logger, buffer) = memory_logger(config, Encoding::Console);

    c.bench_function("info_console", |b| {
        b.iter(|| {
            logger.infof(format_args!("retry {} of {}", black_box(2), 5));
            buffer.clear();
        })
    });
}

fn benchmark_structured_json_entry(c: &mut Criterion) {
    let (logger, buffer) = memory_logger(LoggingConfig::development(), Encoding::Json);
    let fields = sazabi::fields!["user", "alice", "attempt", 3, "ok", true];

    c.bench_function("infow_json", |b| {
        b.iter(|| {
            logger.infow(black_box("login"), &fields);
            buffer.clear();
        })
    });
}

fn benchmark_sampled_entry(c: &mut Criterion) {
    let (logger, buffer) = memory_logger(LoggingConfig::production(), Encoding::Console);

    c.bench_function("info_sampled", |b| {
        b.iter(|| {
            logger.info(&[&black_box("repeated")]);
            buffer.clear();
        })
    });
}

criterion_group!(
    benches,
    benchmark_filtered_entry,
    benchmark_console_entry,
    benchmark_structured_json_entry,
    benchmark_sampled_entry
);
criterion_main!(benches);
