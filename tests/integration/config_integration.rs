use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use vertrace::config::{ConfigLoader, ValidationError};

#[test]
fn test_load_full_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("vertrace.toml");
    fs::write(
        &path,
        r#"
trace_root = "/mnt/shared/vertrace"

[capture]
max_captures = 20
max_anomalies = 2
random_vertices_per_step = 4
seed = 1234
check_vertex_values = true

[logging]
level = "warn"
format = "json"
output = "stderr"

[logging.modules]
"vertrace::store" = "debug"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.trace_root, PathBuf::from("/mnt/shared/vertrace"));
    assert_eq!(config.capture.max_captures, 20);
    assert_eq!(config.capture.max_anomalies, 2);
    assert_eq!(config.capture.random_vertices_per_step, Some(4));
    assert_eq!(config.capture.seed, Some(1234));
    assert!(config.capture.check_vertex_values);
    assert!(!config.capture.check_messages);
    assert!(config.capture.capture_anomalies);
    assert_eq!(config.logging.format, "json");
    assert_eq!(
        config.logging.modules.get("vertrace::store").map(String::as_str),
        Some("debug")
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_ambiguous_selection_is_invalid() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("vertrace.toml");
    fs::write(
        &path,
        r#"
[capture]
vertices = ["1", "2"]
random_vertices_per_step = 3
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ValidationError::Capture(_)));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(ConfigLoader::load_from_file(&temp_dir.path().join("absent.toml")).is_err());
}
