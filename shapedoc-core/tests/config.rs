use std::fs;

use shapedoc_core::config::{AppConfig, ConfigError};

#[test]
fn profile_file_overrides_base() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("application.yaml"),
        "openapi:\n  title: Base\n  version: 1.0.0\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("application-prod.yaml"),
        "openapi:\n  title: Production\n",
    )
    .unwrap();

    let config = AppConfig::load_from_dir(dir.path(), "prod").unwrap();
    assert_eq!(config.get::<String>("openapi.title").unwrap(), "Production");
    assert_eq!(config.get::<String>("openapi.version").unwrap(), "1.0.0");
}

#[test]
fn missing_files_yield_empty_sections() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_from_dir(dir.path(), "dev").unwrap();
    assert!(!config.contains_key("openapi.path"));
}

#[test]
fn malformed_yaml_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("application.yaml"), "openapi: [unclosed").unwrap();
    let err = AppConfig::load_from_dir(dir.path(), "dev").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
    assert!(err.to_string().starts_with("Config load error"));
}

#[test]
fn lists_are_kept_whole() {
    let config = AppConfig::from_yaml_str(
        "openapi:\n  security:\n    - name: bearer\n      scopes: [read]\n",
        "test",
    )
    .unwrap();
    let security: Vec<serde_json::Value> = config.get_section("openapi.security").unwrap();
    assert_eq!(security[0]["name"], "bearer");
    assert_eq!(security[0]["scopes"][0], "read");
}
