//! Global logger tests: every entry point goes through the process-wide handle

use sazabi::{Encoding, Level, LoggingConfig};
use serial_test::serial;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// Install the preset for `environment`, redirected to a file in `dir`
fn install(environment: &str, dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join(format!("{environment}.log"));
    let mut config = LoggingConfig::resolve(environment);
    config.output_paths = vec![path.display().to_string()];
    config.error_output_paths = vec![];
    sazabi::initialize_with(&config).unwrap();
    path
}

fn read_lines(path: &Path) -> Vec<String> {
    sazabi::global().sync();
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
#[serial]
fn test_production_suppresses_debug() {
    let dir = tempfile::tempdir().unwrap();
    let path = install("production", &dir);

    sazabi::debug!("x");
    sazabi::info!("y");

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("INFO"));
    assert!(lines[0].ends_with("\ty"));
}

#[test]
#[serial]
fn test_short_production_label() {
    let dir = tempfile::tempdir().unwrap();
    let path = install("prod", &dir);

    sazabi::error!("disk full");

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("\tERROR\t"));
    assert!(lines[0].ends_with("disk full"));
}

#[test]
#[serial]
fn test_development_formats_debug() {
    let dir = tempfile::tempdir().unwrap();
    let path = install("development", &dir);

    sazabi::debugf!("retry {} of {}", 2, 5);

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("\tDEBUG\t"));
    assert!(lines[0].ends_with("retry 2 of 5"));
}

#[test]
#[serial]
fn test_unknown_labels_fall_back_to_development() {
    for label in ["staging", "", "Production"] {
        let dir = tempfile::tempdir().unwrap();
        let path = install(label, &dir);

        sazabi::debug!("visible");

        assert_eq!(read_lines(&path).len(), 1, "label {label:?}");
        assert_eq!(sazabi::global().level(), Level::Debug);
    }
}

#[test]
#[serial]
fn test_structured_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = install("production", &dir);

    sazabi::infow!("login", "user", "alice");

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("\tlogin\t"));
    assert!(lines[0].ends_with(r#"{"user":"alice"}"#));
}

#[test]
#[serial]
fn test_dangling_key_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = install("development", &dir);

    sazabi::warnw!("half", "k1", 1, "k2");

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().any(|l| l.contains("\tWARN\t") && l.ends_with(r#"{"k1":1}"#)));
    assert!(lines
        .iter()
        .any(|l| l.contains("Ignored key without a value.") && l.contains(r#""ignored":"k2""#)));
}

#[test]
#[serial]
fn test_caller_is_the_call_site() {
    let dir = tempfile::tempdir().unwrap();
    let path = install("production", &dir);

    sazabi::warn!("located");
    let line = line!() - 1;

    let lines = read_lines(&path);
    assert!(lines[0].contains(&format!("integration/global_test.rs:{line}")));
}

#[test]
#[serial]
fn test_reinitialize_replaces_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let first = install("development", &dir);
    sazabi::debug!("first");

    let second = install("production", &dir);
    sazabi::debug!("dropped");
    sazabi::info!("second");

    assert_eq!(read_lines(&first).len(), 1);
    let lines = read_lines(&second);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("second"));
}

#[test]
#[serial]
fn test_default_logger_is_independent() {
    let dir = tempfile::tempdir().unwrap();
    let path = install("production", &dir);

    let private = sazabi::default_logger();
    assert_eq!(private.level(), Level::Debug);

    sazabi::debug!("still filtered");
    assert!(read_lines(&path).is_empty());
    assert_eq!(sazabi::global().level(), Level::Info);
}

#[test]
#[serial]
fn test_failed_initialize_keeps_previous_logger() {
    let dir = tempfile::tempdir().unwrap();
    let path = install("production", &dir);

    let mut broken = LoggingConfig::production();
    broken.output_paths = vec!["ftp://nowhere".to_string()];
    assert!(sazabi::initialize_with(&broken).is_err());

    sazabi::info!("kept");
    assert_eq!(read_lines(&path).len(), 1);
}

#[test]
#[serial]
fn test_panic_entry_is_written_before_unwinding() {
    let dir = tempfile::tempdir().unwrap();
    let path = install("development", &dir);

    let result = std::panic::catch_unwind(|| {
        sazabi::panicf!("invariant broken: {}", 7);
    });

    let payload = result.unwrap_err();
    assert_eq!(
        payload.downcast_ref::<String>().map(String::as_str),
        Some("invariant broken: 7")
    );
    let lines = read_lines(&path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("\tPANIC\t"));
}

#[test]
#[serial]
fn test_reinitialize_while_logging() {
    const WORKERS: u64 = 4;
    const ENTRIES: u64 = 2000;

    let dir = tempfile::tempdir().unwrap();
    let console_path = dir.path().join("console.log");
    let json_path = dir.path().join("json.log");

    let mut console = LoggingConfig::production();
    console.sampling = None;
    console.output_paths = vec![console_path.display().to_string()];
    console.error_output_paths = vec![];
    let mut json = console.clone();
    json.encoding = Encoding::Json;
    json.output_paths = vec![json_path.display().to_string()];

    sazabi::initialize_with(&console).unwrap();
    let done = AtomicBool::new(false);

    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..WORKERS)
            .map(|worker| {
                scope.spawn(move || {
                    for n in 0..ENTRIES {
                        sazabi::infow!("tick", "worker", worker, "n", n);
                    }
                })
            })
            .collect();

        let swapper = scope.spawn(|| {
            let mut round = 0u64;
            while !done.load(Ordering::Acquire) {
                let config = if round % 2 == 0 { &json } else { &console };
                sazabi::initialize_with(config).unwrap();
                round += 1;
                std::thread::sleep(Duration::from_micros(200));
            }
        });

        let finished: Vec<_> = workers.into_iter().map(|worker| worker.join()).collect();
        done.store(true, Ordering::Release);
        swapper.join().unwrap();
        assert!(finished.iter().all(Result::is_ok));
    });

    let console_lines = read_lines(&console_path);
    let json_lines = read_lines(&json_path);

    for line in &console_lines {
        let parts: Vec<&str> = line.split('\t').collect();
        assert_eq!(parts.len(), 5, "line {line:?}");
        assert_eq!(parts[1], "INFO");
        assert_eq!(parts[3], "tick");
        let fields: serde_json::Value = serde_json::from_str(parts[4]).unwrap();
        assert!(fields["worker"].is_u64() && fields["n"].is_u64());
    }
    for line in &json_lines {
        let entry: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(entry["level"], "INFO");
        assert_eq!(entry["msg"], "tick");
        assert!(entry["worker"].is_u64() && entry["n"].is_u64());
    }
    assert_eq!(
        (console_lines.len() + json_lines.len()) as u64,
        WORKERS * ENTRIES
    );
}
