//! Configuration loading tests against real files.
//!
//! Covers:
//! - Tolerant degrade-to-empty for missing, malformed, and non-object files
//! - JSON and YAML documents
//! - Resolution order (explicit > environment > working directory)
//! - Strict schema loading

use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use cfgval_config::{
    load_config, load_root_schema, read_config_file, resolve_config_path, ConfigError,
    ConfigOrigin, LoadStatus, DEFAULT_CONFIG_FILENAME, ENV_CONFIG_PATH,
};
use serde_json::json;
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Restores an environment variable on drop.
struct EnvGuard {
    key: &'static str,
    saved: Option<String>,
}

impl EnvGuard {
    fn new(key: &'static str) -> Self {
        Self {
            key,
            saved: env::var(key).ok(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.saved {
            Some(val) => env::set_var(self.key, val),
            None => env::remove_var(self.key),
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f()
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

#[test]
fn test_missing_file_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    let (value, status) = read_config_file(&dir.path().join("absent.json"));
    assert_eq!(value, json!({}));
    assert_eq!(status, LoadStatus::NotFound);
}

#[test]
fn test_malformed_json_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "config.json", "{ \"app\": ");
    let (value, status) = read_config_file(&path);
    assert_eq!(value, json!({}));
    match status {
        LoadStatus::Unusable(reason) => assert!(reason.contains("invalid JSON"), "{reason}"),
        other => panic!("expected Unusable, got {other:?}"),
    }
}

#[test]
fn test_non_object_document_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "config.json", "[1, 2, 3]");
    let (value, status) = read_config_file(&path);
    assert_eq!(value, json!({}));
    assert_eq!(
        status,
        LoadStatus::Unusable("expected a top-level object, found array".to_string())
    );
}

#[test]
fn test_json_and_yaml_documents_load() {
    let dir = TempDir::new().unwrap();
    let json_path = write(
        dir.path(),
        "config.json",
        r#"{"database": {"host": "localhost", "port": 5432}}"#,
    );
    let yaml_path = write(
        dir.path(),
        "config.yaml",
        "database:\n  host: localhost\n  port: 5432\n",
    );

    let (from_json, status) = read_config_file(&json_path);
    assert_eq!(status, LoadStatus::Loaded);
    let (from_yaml, status) = read_config_file(&yaml_path);
    assert_eq!(status, LoadStatus::Loaded);
    assert_eq!(from_json, from_yaml);
}

#[test]
fn test_explicit_path_beats_environment() {
    with_env_lock(|| {
        let _env = EnvGuard::new(ENV_CONFIG_PATH);
        let dir = TempDir::new().unwrap();
        let explicit = write(dir.path(), "explicit.json", r#"{"source": "explicit"}"#);
        let from_env = write(dir.path(), "env.json", r#"{"source": "env"}"#);
        env::set_var(ENV_CONFIG_PATH, &from_env);

        let loaded = load_config(Some(&explicit));
        assert_eq!(loaded.origin, ConfigOrigin::Explicit);
        assert_eq!(loaded.value, json!({"source": "explicit"}));

        let loaded = load_config(None);
        assert_eq!(loaded.origin, ConfigOrigin::Environment);
        assert_eq!(loaded.value, json!({"source": "env"}));
    });
}

#[test]
fn test_working_directory_fallback() {
    with_env_lock(|| {
        let _env = EnvGuard::new(ENV_CONFIG_PATH);
        env::remove_var(ENV_CONFIG_PATH);

        let (path, origin) = resolve_config_path(None);
        assert_eq!(origin, ConfigOrigin::WorkingDirectory);
        assert!(path.ends_with(DEFAULT_CONFIG_FILENAME));
    });
}

#[test]
fn test_blank_environment_value_ignored() {
    with_env_lock(|| {
        let _env = EnvGuard::new(ENV_CONFIG_PATH);
        env::set_var(ENV_CONFIG_PATH, "  ");

        let (_, origin) = resolve_config_path(None);
        assert_eq!(origin, ConfigOrigin::WorkingDirectory);
    });
}

#[test]
fn test_load_root_schema_from_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "schema.yaml",
        r#"
description: Example
properties:
  - name: database
    type: object
    properties:
      - name: host
        type: string
        required: true
      - name: ssl
        type: enum
        enum: [disable, require]
        defaultValue: disable
"#,
    );

    let schema = load_root_schema(&path).unwrap();
    assert_eq!(schema.description, "Example");
    let database = schema.section("database").unwrap();
    assert_eq!(database.properties().len(), 2);
    assert!(database.properties()[0].is_required());
}

#[test]
fn test_load_root_schema_is_strict() {
    let dir = TempDir::new().unwrap();

    let err = load_root_schema(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, ConfigError::SchemaLoad { .. }));

    let path = write(dir.path(), "broken.json", "{ nope");
    let err = load_root_schema(&path).unwrap_err();
    assert!(err.to_string().contains("invalid JSON"));

    let path = write(
        dir.path(),
        "conflict.json",
        r#"{"properties": [{"name": "a", "type": "string", "required": true, "defaultValue": "x"}]}"#,
    );
    let err = load_root_schema(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Schema(_)));
}
