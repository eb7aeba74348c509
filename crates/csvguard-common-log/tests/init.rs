//! Global subscriber installation. Kept in its own test binary because a
//! global subscriber can only be set once per process.

use csvguard_common_log::{init, LogConfig, LogFormat, LogLevel};
use csvguard_test_utils::{assert_err, assert_ok, temp_dir};

#[test]
fn test_init_appends_json_to_file() {
    std::env::remove_var("RUST_LOG");
    let dir = temp_dir();
    let path = dir.path().join("csvguard.log");

    let config = LogConfig {
        level: LogLevel::Info,
        format: LogFormat::Json,
        file_path: Some(path.clone()),
        ..LogConfig::default()
    };
    assert_ok!(init(config.clone()));

    tracing::info!(rows = 3, "export finished");
    tracing::debug!("filtered out");

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("export finished"));
    assert!(contents.contains("\"rows\":3"));
    assert!(!contents.contains("filtered out"));

    let err = assert_err!(init(config));
    assert!(err.to_string().contains("failed to initialize logging"));
}
