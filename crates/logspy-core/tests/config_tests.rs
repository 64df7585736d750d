#![allow(clippy::unwrap_used, clippy::expect_used)]

use logspy_core::config::{LevelMap, LoggerConfig, OutputFormat};
use logspy_core::errors::ErrorKind;
use logspy_core::LogLevel;

#[test]
fn test_config_file_round_trips_into_level_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logspy.toml");
    std::fs::write(
        &path,
        r#"
        scopes_enabled = true
        output_format = "PlainText"

        [log_level]
        Default = "info"
        "Microsoft.*" = "warn"
        "Microsoft.Hosting.Lifetime" = "Debug"
        "#,
    )
    .unwrap();

    let config = LoggerConfig::from_file(&path).unwrap();
    assert_eq!(config.options.output_format, OutputFormat::PlainText);

    let levels = config.level_map().unwrap();
    assert_eq!(levels.default_level(), LogLevel::Information);
    assert_eq!(
        levels.min_level_for("Microsoft.EntityFramework"),
        LogLevel::Warning
    );
    assert_eq!(
        levels.min_level_for("Microsoft.Hosting.Lifetime"),
        LogLevel::Debug
    );
    assert_eq!(levels.min_level_for("App"), LogLevel::Information);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LoggerConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_malformed_document_is_invalid_config() {
    let err = LoggerConfig::from_toml_str("scopes_enabled = [").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    assert_eq!(err.code(), "ERR_INVALID_CONFIG");
}

#[test]
fn test_pairs_without_default_are_rejected() {
    let err = LevelMap::from_pairs([("App", LogLevel::Debug)]).unwrap_err();
    assert_eq!(err.code(), "ERR_MISSING_DEFAULT_LEVEL");
    assert!(err.to_string().contains("'Default'"));
}
