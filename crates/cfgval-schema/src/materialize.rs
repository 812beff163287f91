//! # Default Materialization
//!
//! Builds the defaulted copy of a configuration section. This is the
//! second of the two validation phases and, like the first, is pure: the
//! raw configuration is read, never written.
//!
//! Resolution per declared property:
//!
//! ```text
//! raw value present ──▶ raw value (nested object defaults applied)
//! absent, default   ──▶ declared default, nested defaults filled
//! absent, none      ──▶ explicit absent marker (None)
//! ```

use cfgval_core::SchemaNode;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Resolved values for the properties of one object node, in schema order.
///
/// Properties that were neither supplied nor defaulted are kept as
/// explicit absent entries so callers can tell "declared but unset" from
/// "not declared at all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedConfig {
    entries: Vec<(String, Option<Value>)>,
}

impl ValidatedConfig {
    /// Resolved value of `name`, if declared and set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Whether `name` is a declared property (set or not).
    pub fn declares(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Number of declared properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no property is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared properties in schema order, with `None` for unset ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_ref()))
    }

    /// Render as a JSON object. Unset properties are omitted.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .filter_map(|(key, value)| value.clone().map(|v| (key.clone(), v)))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for ValidatedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let set = self.entries.iter().filter(|(_, value)| value.is_some()).count();
        let mut map = serializer.serialize_map(Some(set))?;
        for (key, value) in &self.entries {
            if let Some(value) = value {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

/// Build the defaulted copy of `section` for `node`.
///
/// Only object nodes with declared properties produce entries; every
/// other node yields an empty [`ValidatedConfig`]. A missing or
/// non-object section resolves every property from its default.
pub fn materialize(node: &SchemaNode, section: Option<&Value>) -> ValidatedConfig {
    let SchemaNode::Object(object) = node else {
        return ValidatedConfig::default();
    };
    let raw = section.and_then(Value::as_object);
    let entries = object
        .properties
        .iter()
        .map(|property| {
            let found = raw.and_then(|map| map.get(property.name()));
            (property.name().to_string(), resolve(property, found))
        })
        .collect();
    ValidatedConfig { entries }
}

fn resolve(property: &SchemaNode, found: Option<&Value>) -> Option<Value> {
    match found {
        Some(value) => Some(with_nested_defaults(property, value)),
        None => property
            .default_json()
            .map(|default| with_nested_defaults(property, &default)),
    }
}

fn with_nested_defaults(property: &SchemaNode, value: &Value) -> Value {
    match (property, value) {
        (SchemaNode::Object(node), Value::Object(map)) if !node.properties.is_empty() => {
            let mut out = map.clone();
            for child in &node.properties {
                match map.get(child.name()) {
                    Some(found) => {
                        out.insert(child.name().to_string(), with_nested_defaults(child, found));
                    }
                    None => {
                        if let Some(default) = child.default_json() {
                            out.insert(child.name().to_string(), default);
                        }
                    }
                }
            }
            Value::Object(out)
        }
        _ => value.clone(),
    }
}
