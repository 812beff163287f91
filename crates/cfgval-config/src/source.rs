//! # Configuration Sources
//!
//! Finds and reads the raw configuration document.
//!
//! ## Resolution Order
//!
//! 1. Explicit path supplied by the caller
//! 2. `CFGVAL_CONFIG` environment variable
//! 3. `config.json` in the current working directory
//!
//! ## Tolerant Loading
//!
//! A missing, unreadable, or malformed configuration file is not fatal:
//! it degrades to an empty document with a warning. A missing *required*
//! section then surfaces as a validation violation instead of a crash.
//! Schema files are the opposite: [`load_root_schema`] fails loudly.

use std::fmt;
use std::path::{Path, PathBuf};

use cfgval_core::RootSchema;
use cfgval_schema::ConfigValidator;
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Environment variable naming the configuration file.
pub const ENV_CONFIG_PATH: &str = "CFGVAL_CONFIG";

/// File looked up in the working directory when nothing else is set.
pub const DEFAULT_CONFIG_FILENAME: &str = "config.json";

/// Where the configuration path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Supplied by the caller.
    Explicit,
    /// Read from [`ENV_CONFIG_PATH`].
    Environment,
    /// [`DEFAULT_CONFIG_FILENAME`] under the working directory.
    WorkingDirectory,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::Explicit => write!(f, "explicit path"),
            ConfigOrigin::Environment => write!(f, "environment variable"),
            ConfigOrigin::WorkingDirectory => write!(f, "working directory"),
        }
    }
}

/// What happened when the configuration file was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The file was read and parsed.
    Loaded,
    /// No file exists at the path.
    NotFound,
    /// The file exists but could not be read or parsed.
    Unusable(String),
}

/// A raw configuration document and how it was obtained.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Path that was read.
    pub path: PathBuf,
    /// How the path was chosen.
    pub origin: ConfigOrigin,
    /// Outcome of the read.
    pub status: LoadStatus,
    /// Parsed document; an empty object unless `status` is `Loaded`.
    pub value: Value,
}

impl LoadedConfig {
    /// Consume self and wrap the document in a validator.
    pub fn into_validator(self) -> ConfigValidator {
        ConfigValidator::new(self.value)
    }
}

/// Pick the configuration path using the resolution order above.
pub fn resolve_config_path(explicit: Option<&Path>) -> (PathBuf, ConfigOrigin) {
    if let Some(path) = explicit {
        return (path.to_path_buf(), ConfigOrigin::Explicit);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        if !env_path.trim().is_empty() {
            return (PathBuf::from(env_path), ConfigOrigin::Environment);
        }
    }

    let path = match std::env::current_dir() {
        Ok(cwd) => cwd.join(DEFAULT_CONFIG_FILENAME),
        Err(_) => PathBuf::from(DEFAULT_CONFIG_FILENAME),
    };
    (path, ConfigOrigin::WorkingDirectory)
}

/// Resolve the configuration path and read it. Never fails.
pub fn load_config(explicit: Option<&Path>) -> LoadedConfig {
    let (path, origin) = resolve_config_path(explicit);
    tracing::debug!(path = %path.display(), %origin, "resolved configuration path");
    let (value, status) = read_config_file(&path);
    LoadedConfig {
        path,
        origin,
        status,
        value,
    }
}

/// Read a configuration document, degrading to `{}` on any problem.
pub fn read_config_file(path: &Path) -> (Value, LoadStatus) {
    let empty = || Value::Object(Map::new());

    if !path.exists() {
        tracing::warn!(path = %path.display(), "Config file not found");
        return (empty(), LoadStatus::NotFound);
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read file: {e}"))
        .and_then(|content| parse_document(path, &content));

    match parsed {
        Ok(value @ Value::Object(_)) => (value, LoadStatus::Loaded),
        Ok(other) => {
            let reason = format!("expected a top-level object, found {}", kind_name(&other));
            tracing::warn!(path = %path.display(), %reason, "Failed to parse config file");
            (empty(), LoadStatus::Unusable(reason))
        }
        Err(reason) => {
            tracing::warn!(path = %path.display(), %reason, "Failed to parse config file");
            (empty(), LoadStatus::Unusable(reason))
        }
    }
}

/// Load a root schema from a JSON or YAML file.
///
/// # Errors
///
/// Returns [`ConfigError::SchemaLoad`] if the file cannot be read or
/// parsed, and [`ConfigError::Schema`] if it is not a valid schema.
pub fn load_root_schema(path: &Path) -> Result<RootSchema, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SchemaLoad {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;
    let value = parse_document(path, &content).map_err(|reason| ConfigError::SchemaLoad {
        path: path.display().to_string(),
        reason,
    })?;
    Ok(RootSchema::from_value(value)?)
}

/// Parse by extension: `.yaml`/`.yml` as YAML, everything else as JSON.
fn parse_document(path: &Path, content: &str) -> Result<Value, String> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}"))?;
            yaml_to_json(yaml, "")
        }
        _ => serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}")),
    }
}

fn kind_name(value: &Value) -> &'static str {
    cfgval_core::ValueKind::of(value).as_str()
}

/// Convert a YAML document into the JSON value model the engine checks.
///
/// Scalar map keys become strings and tags are ignored. `at` is the dotted
/// location named when a node has no JSON form.
fn yaml_to_json(yaml: serde_yaml::Value, at: &str) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            yaml_number(&n).ok_or_else(|| format!("number {n} at '{at}' has no JSON form"))?
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| yaml_to_json(item, &child_path(at, &i.to_string())))
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, value) in entries {
                let key = match key {
                    Yaml::String(s) => s,
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    other => {
                        return Err(format!("map key at '{at}' must be a scalar, found {other:?}"))
                    }
                };
                let value = yaml_to_json(value, &child_path(at, &key))?;
                map.insert(key, value);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value, at)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Option<Value> {
    if let Some(i) = n.as_i64() {
        Some(Value::from(i))
    } else if let Some(u) = n.as_u64() {
        Some(Value::from(u))
    } else {
        n.as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
    }
}

fn child_path(at: &str, key: &str) -> String {
    if at.is_empty() {
        key.to_string()
    } else {
        format!("{at}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_origin_display() {
        assert_eq!(ConfigOrigin::Explicit.to_string(), "explicit path");
        assert_eq!(ConfigOrigin::Environment.to_string(), "environment variable");
        assert_eq!(ConfigOrigin::WorkingDirectory.to_string(), "working directory");
    }

    #[test]
    fn test_explicit_path_wins() {
        let (path, origin) = resolve_config_path(Some(Path::new("/srv/app/settings.json")));
        assert_eq!(path, PathBuf::from("/srv/app/settings.json"));
        assert_eq!(origin, ConfigOrigin::Explicit);
    }

    #[test]
    fn test_yaml_to_json_conversion() {
        let yaml_str = r#"
database:
  host: localhost
  port: 5432
  ratio: 0.5
  ssl: disable
flags:
  - one
  - two
1: numeric-key
"#;
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(yaml_str).unwrap();
        let json_value = yaml_to_json(yaml_value, "").unwrap();

        assert_eq!(json_value["database"]["host"], "localhost");
        assert_eq!(json_value["database"]["port"], 5432);
        assert_eq!(json_value["database"]["ratio"], 0.5);
        assert_eq!(json_value["flags"], json!(["one", "two"]));
        assert_eq!(json_value["1"], "numeric-key");
    }

    #[test]
    fn test_parse_document_dispatches_on_extension() {
        let yaml = parse_document(Path::new("c.yml"), "app:\n  debug: true\n").unwrap();
        assert_eq!(yaml, json!({"app": {"debug": true}}));

        let json = parse_document(Path::new("c.json"), r#"{"app": {"debug": true}}"#).unwrap();
        assert_eq!(json, yaml);

        let err = parse_document(Path::new("c.conf"), "app: 1").unwrap_err();
        assert!(err.starts_with("invalid JSON"));
    }

    #[test]
    fn test_yaml_without_json_form_names_location() {
        let err = parse_document(Path::new("c.yaml"), "limits:\n  max: .inf\n").unwrap_err();
        assert!(err.contains("at 'limits.max' has no JSON form"), "{err}");
    }
}
