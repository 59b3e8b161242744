//! Configuration files and the loggers built from them

use sazabi::config::EncoderConfig;
use sazabi::{BuildError, Encoding, Level, LoggingConfig, SamplingConfig};

#[test]
fn test_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("service.log");
    let config_path = dir.path().join("logging.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
            level = "warn"
            encoding = "json"
            output_paths = ["{}"]
            error_output_paths = []

            [sampling]
            initial = 10
            thereafter = 5

            [initial_fields]
            service = "billing"
            "#,
            log_path.display()
        ),
    )
    .unwrap();

    let config = LoggingConfig::load(&config_path).unwrap();
    assert_eq!(config.level, Level::Warn);
    assert_eq!(config.encoding, Encoding::Json);
    assert_eq!(
        config.sampling,
        Some(SamplingConfig {
            initial: 10,
            thereafter: 5
        })
    );
    assert_eq!(config.encoder, EncoderConfig::production());
}

#[test]
fn test_json_file_logger_carries_initial_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("service.log");

    let mut config = LoggingConfig::production();
    config.encoding = Encoding::Json;
    config.output_paths = vec![format!("file://{}", path.display())];
    config.error_output_paths = vec![];
    config
        .initial_fields
        .insert("service".to_string(), "billing".into());

    let logger = config.build().unwrap();
    sazabi::Log::warnw(&logger, "slow query", &sazabi::fields!["ms", 812]);
    logger.sync();

    let content = std::fs::read_to_string(&path).unwrap();
    let entry: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
    assert_eq!(entry["level"], "WARN");
    assert_eq!(entry["msg"], "slow query");
    assert_eq!(entry["service"], "billing");
    assert_eq!(entry["ms"], 812);
    assert!(entry["ts"].is_string());
    assert!(entry["caller"]
        .as_str()
        .unwrap()
        .starts_with("integration/config_test.rs:"));
}

#[test]
fn test_unreadable_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = LoggingConfig::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(BuildError::Io(_))));
}

#[test]
fn test_malformed_config_file() {
    let result = LoggingConfig::from_toml_str("level = \"loud\"");
    assert!(matches!(result, Err(BuildError::Config(_))));
}

#[test]
fn test_build_rejects_unopenable_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = LoggingConfig::development();
    config.output_paths = vec![dir
        .path()
        .join("no")
        .join("such")
        .join("dir.log")
        .display()
        .to_string()];

    assert!(matches!(config.build(), Err(BuildError::OpenSink { .. })));
}
