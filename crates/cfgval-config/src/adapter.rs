//! # Schema Resolution
//!
//! Turns a [`RootSchema`] plus a raw document into the validated,
//! defaulted configuration of every top-level section, ready to hand to
//! application code.
//!
//! Resolution is all-or-nothing: every section is validated first and
//! any violation anywhere aborts with the full list, logged one line per
//! violation.

use std::path::Path;

use cfgval_core::RootSchema;
use cfgval_schema::{ConfigValidator, ValidatedConfig};
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::source::load_config;

/// Validated configuration for every top-level section, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    sections: Vec<(String, ValidatedConfig)>,
}

impl ResolvedConfig {
    /// The resolved section called `name`.
    pub fn section(&self, name: &str) -> Option<&ValidatedConfig> {
        self.sections
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, config)| config)
    }

    /// Deserialize the section called `name` into a caller type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownSection`] if no such section exists
    /// and [`ConfigError::Deserialize`] if its shape does not fit `T`.
    pub fn section_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, ConfigError> {
        let config = self
            .section(name)
            .ok_or_else(|| ConfigError::UnknownSection(name.to_string()))?;
        serde_json::from_value(config.to_json()).map_err(|e| ConfigError::Deserialize {
            section: name.to_string(),
            reason: e.to_string(),
        })
    }

    /// Section names in schema order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True when the schema declared no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render every section as one JSON object.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .sections
            .iter()
            .map(|(name, config)| (name.clone(), config.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (name, config) in &self.sections {
            map.serialize_entry(name, config)?;
        }
        map.end()
    }
}

/// Validate every section of `root`, then resolve each one.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] with every violation if any
/// section is invalid, or [`ConfigError::Section`] if a section fails
/// while being resolved.
pub fn configure(
    root: &RootSchema,
    validator: &ConfigValidator,
) -> Result<ResolvedConfig, ConfigError> {
    let result = validator.validate_root_schema(root);
    if !result.is_valid() {
        tracing::error!(violations = result.errors().len(), "Configuration validation failed");
        for violation in result.errors() {
            tracing::error!("- {violation}");
        }
        return Err(ConfigError::Validation { violations: result });
    }

    let mut sections = Vec::with_capacity(root.properties.len());
    for node in &root.properties {
        let config = validator
            .validated_config(node, Some(node.name()))
            .map_err(|e| {
                tracing::error!(
                    section = node.name(),
                    error = %e,
                    "failed to resolve configuration section"
                );
                e
            })?;
        sections.push((node.name().to_string(), config));
    }

    tracing::debug!(sections = sections.len(), "configuration resolved");
    Ok(ResolvedConfig { sections })
}

/// Load the configuration document (see [`load_config`]) and resolve it.
pub fn configure_from_path(
    root: &RootSchema,
    explicit: Option<&Path>,
) -> Result<ResolvedConfig, ConfigError> {
    let loaded = load_config(explicit);
    configure(root, &loaded.into_validator())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgval_core::{BooleanNode, NumberNode, ObjectNode, StringNode};
    use serde::Deserialize;
    use serde_json::json;

    fn schema() -> RootSchema {
        RootSchema::new(
            "test",
            vec![
                ObjectNode::new(
                    "app",
                    vec![
                        NumberNode::new("port").with_default(3000).into(),
                        BooleanNode::new("debug").with_default(false).into(),
                    ],
                )
                .into(),
                ObjectNode::new("redis", vec![StringNode::new("host").required().into()]).into(),
            ],
        )
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct AppSettings {
        port: u16,
        debug: bool,
    }

    #[test]
    fn test_configure_resolves_every_section() {
        let validator = ConfigValidator::new(json!({"redis": {"host": "cache"}}));
        let resolved = configure(&schema(), &validator).unwrap();

        assert_eq!(resolved.names().collect::<Vec<_>>(), vec!["app", "redis"]);
        assert_eq!(
            resolved.to_json(),
            json!({"app": {"port": 3000, "debug": false}, "redis": {"host": "cache"}})
        );
        assert_eq!(
            resolved.section_as::<AppSettings>("app").unwrap(),
            AppSettings {
                port: 3000,
                debug: false
            }
        );
    }

    #[test]
    fn test_configure_fails_with_all_messages() {
        let validator = ConfigValidator::new(json!({"app": {"port": "x"}, "redis": {}}));
        let err = configure(&schema(), &validator).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Configuration validation failed: "));
        assert!(message.contains("Property 'app.port' must be a number, got string"));
        assert!(message.contains("Required property 'redis.host' is missing"));
    }

    #[test]
    fn test_section_as_errors() {
        let validator = ConfigValidator::new(json!({"redis": {"host": "cache"}}));
        let resolved = configure(&schema(), &validator).unwrap();

        assert!(matches!(
            resolved.section_as::<AppSettings>("missing"),
            Err(ConfigError::UnknownSection(_))
        ));
        assert!(matches!(
            resolved.section_as::<AppSettings>("redis"),
            Err(ConfigError::Deserialize { .. })
        ));
    }
}
