mod harness;

use fraudwatch::error::{ConfigError, Error};
use fraudwatch::infrastructure::config::Config;
use fraudwatch::testkit;

use harness::temp_config::write_temp_config;

#[test]
fn config_loads_from_file() {
    let file = write_temp_config(&testkit::config::toml("https://fraud.example.com"));

    let config = tokio_test::assert_ok!(Config::load(file.path()));

    assert_eq!(config.backend.base_url, "https://fraud.example.com");
    assert_eq!(config.monitor.connect_timeout_ms, 500);
    assert_eq!(config.monitor.transaction_capacity, 40);
    assert_eq!(config.monitor.alert_capacity, 10);
    assert_eq!(config.fetch.max_retries, 2);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(
        config.backend.realtime_url().unwrap().as_str(),
        "wss://fraud.example.com/ws/realtime"
    );
}

#[test]
fn config_rejects_zero_capacity() {
    let toml = r#"
[backend]
base_url = "http://localhost:8000"

[monitor]
transaction_capacity = 0
"#;
    let file = write_temp_config(toml);

    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "transaction_capacity",
            ..
        })
    ));
}

#[test]
fn config_rejects_unsupported_scheme() {
    let file = write_temp_config("[backend]\nbase_url = \"ftp://example.com\"\n");

    let err = Config::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("base_url"), "{err}");
}

#[test]
fn config_rejects_malformed_toml() {
    let file = write_temp_config("[backend\nbase_url = ");

    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn missing_file_is_an_error_for_load_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    assert!(matches!(
        Config::load(&path).unwrap_err(),
        Error::Config(ConfigError::ReadFile(_))
    ));
    let config = tokio_test::assert_ok!(Config::load_or_default(&path));
    assert_eq!(config.monitor.transaction_capacity, 40);
}
