//! Settings file round-trips through real files.

use rangefn_config::{ConfigError, Settings};

#[test]
fn test_save_and_load_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/settings.json");

    let settings = Settings {
        endpoint: "http://127.0.0.1:9000/add-one".into(),
        timeout_ms: None,
        poll_interval_ms: 400,
        max_attempts: Some(3),
    };
    settings.save_to(&path).unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded, settings);

    // Dotted keys are the on-disk contract
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["remote.endpoint"], "http://127.0.0.1:9000/add-one");
    assert!(raw["remote.timeoutMs"].is_null());
    assert_eq!(raw["registration.pollIntervalMs"], 400);
    assert_eq!(raw["registration.maxAttempts"], 3);
}

#[test]
fn test_load_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Settings::load_from(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_load_broken_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ \"remote.endpoint\": ").unwrap();

    let err = Settings::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Error parsing"));
}

#[test]
fn test_load_or_default_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = Settings::load_or_default(&dir.path().join("absent.json"));
    assert_eq!(loaded, Settings::default());
}

#[test]
fn test_load_or_default_broken_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ \"remote.endpoint\": ").unwrap();

    assert_eq!(Settings::load_or_default(&path), Settings::default());

    // Wrong types are just as broken as bad syntax
    std::fs::write(&path, r#"{ "remote.timeoutMs": "soon" }"#).unwrap();
    assert_eq!(Settings::load_or_default(&path), Settings::default());
}

#[test]
fn test_load_or_default_reads_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        "// local service\n{ \"remote.endpoint\": \"http://localhost:8080/add-one\" }\n",
    )
    .unwrap();

    let loaded = Settings::load_or_default(&path);
    assert_eq!(loaded.endpoint, "http://localhost:8080/add-one");
    assert_eq!(loaded.timeout_ms, Settings::default().timeout_ms);
}
