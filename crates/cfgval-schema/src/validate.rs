//! # Configuration Validation
//!
//! Checks raw JSON configuration against a [`SchemaNode`] tree.
//!
//! ## Two Phases
//!
//! 1. [`check`] walks a section and collects every [`Violation`]. It never
//!    touches the configuration.
//! 2. [`materialize`](crate::materialize()) builds the defaulted copy once
//!    the check passed.
//!
//! [`ConfigValidator`] owns a raw configuration document and runs both
//! phases per section. Because neither phase mutates, a validator can be
//! shared freely and repeated calls see identical input.
//!
//! ## Exhaustiveness
//!
//! Sibling properties are always checked exhaustively, at every nesting
//! level: a nested object with two bad children reports both. Within a
//! single scalar property only the first violated constraint is reported,
//! in declaration order (type, then bounds, then pattern).

use cfgval_core::{EnumNode, NumberNode, RootSchema, SchemaNode, StringNode, ValueKind};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::materialize::{materialize, ValidatedConfig};
use crate::violation::{ValidationResult, Violation};

/// Raised when defaulted configuration is requested for an invalid section.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The section did not conform to its schema.
    #[error("Configuration validation failed for {schema_name}: {violations}")]
    ValidationFailed {
        /// Name of the schema node that was validated.
        schema_name: String,
        /// Every violation found.
        violations: ValidationResult,
    },
}

impl ValidationError {
    /// The violations carried by this error.
    pub fn violations(&self) -> &ValidationResult {
        match self {
            Self::ValidationFailed { violations, .. } => violations,
        }
    }
}

// ─── Pure Check ──────────────────────────────────────────────────────

/// Collect every violation of `section` against `node`.
///
/// `None` and JSON `null` both mean the section is absent, which is only
/// a violation when `node` is required. Only object nodes with declared
/// properties are inspected further.
pub fn check(node: &SchemaNode, section: Option<&Value>) -> Vec<Violation> {
    let Some(config) = section.filter(|value| !value.is_null()) else {
        if node.is_required() {
            return vec![Violation::MissingSection {
                section: node.name().to_string(),
            }];
        }
        return Vec::new();
    };

    let properties = node.properties();
    if properties.is_empty() {
        return Vec::new();
    }

    let Some(map) = config.as_object() else {
        return vec![Violation::TypeMismatch {
            path: node.name().to_string(),
            expected: ValueKind::Object,
            actual: ValueKind::of(config),
        }];
    };

    let mut violations = Vec::new();
    check_properties(properties, map, node.name(), &mut violations);
    violations
}

fn check_properties(
    properties: &[SchemaNode],
    map: &Map<String, Value>,
    parent: &str,
    out: &mut Vec<Violation>,
) {
    for property in properties {
        let path = format!("{parent}.{}", property.name());
        let Some(value) = map.get(property.name()) else {
            // Absent: an error only when required. A declared default is
            // trusted and applied by the materialize phase.
            if property.is_required() {
                out.push(Violation::MissingProperty { path });
            }
            continue;
        };

        out.extend(validate_property_type(property, value, &path));

        if let SchemaNode::Enum(node) = property {
            out.extend(validate_enum_property(node, &path));
        }
    }
}

/// Type- and constraint-check one present value.
///
/// Scalars report at most one violation (the first constraint broken).
/// Objects recurse into their declared children and report every
/// violation found below them.
pub fn validate_property_type(property: &SchemaNode, value: &Value, path: &str) -> Vec<Violation> {
    match property {
        SchemaNode::String(node) => check_string(node, value, path).into_iter().collect(),
        SchemaNode::Number(node) => check_number(node, value, path).into_iter().collect(),
        SchemaNode::Boolean(_) => {
            if value.is_boolean() {
                Vec::new()
            } else {
                vec![mismatch(path, ValueKind::Boolean, value)]
            }
        }
        SchemaNode::Object(node) => match value.as_object() {
            Some(map) => {
                let mut out = Vec::new();
                check_properties(&node.properties, map, path, &mut out);
                out
            }
            None => vec![mismatch(path, ValueKind::Object, value)],
        },
        SchemaNode::Enum(node) => {
            let member = value.as_str().is_some_and(|candidate| node.allows(candidate));
            if member {
                Vec::new()
            } else {
                vec![Violation::NotInEnum {
                    path: path.to_string(),
                    allowed: node.allowed.clone(),
                    actual: render(value),
                }]
            }
        }
    }
}

/// Check that an enum's own default and examples belong to its literal set.
///
/// This inspects the schema, not the configuration: a bad default is
/// reported whatever value was supplied.
pub fn validate_enum_property(node: &EnumNode, path: &str) -> Option<Violation> {
    if let Some(default) = node.presence.default_value() {
        if !node.allows(default) {
            return Some(Violation::DefaultNotInEnum {
                path: path.to_string(),
                value: default.clone(),
                allowed: node.allowed.clone(),
            });
        }
    }

    node.examples
        .iter()
        .find(|example| !node.allows(example))
        .map(|example| Violation::ExampleNotInEnum {
            path: path.to_string(),
            value: example.clone(),
            allowed: node.allowed.clone(),
        })
}

fn check_string(node: &StringNode, value: &Value, path: &str) -> Option<Violation> {
    let Some(text) = value.as_str() else {
        return Some(mismatch(path, ValueKind::String, value));
    };

    let length = text.chars().count();
    if let Some(min) = node.min_length {
        if length < min {
            return Some(Violation::TooShort {
                path: path.to_string(),
                min,
            });
        }
    }
    if let Some(max) = node.max_length {
        if length > max {
            return Some(Violation::TooLong {
                path: path.to_string(),
                max,
            });
        }
    }

    if let Some(pattern) = &node.pattern {
        match Regex::new(pattern) {
            Ok(regex) if regex.is_match(text) => {}
            Ok(_) => {
                return Some(Violation::PatternMismatch {
                    path: path.to_string(),
                    pattern: pattern.clone(),
                })
            }
            Err(e) => {
                return Some(Violation::InvalidPattern {
                    path: path.to_string(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    None
}

fn check_number(node: &NumberNode, value: &Value, path: &str) -> Option<Violation> {
    let Value::Number(number) = value else {
        return Some(mismatch(path, ValueKind::Number, value));
    };
    let actual = number.as_f64()?;

    if let Some(min) = node.min {
        if actual < min {
            return Some(Violation::BelowMinimum {
                path: path.to_string(),
                min,
                actual: number.clone(),
            });
        }
    }
    if let Some(max) = node.max {
        if actual > max {
            return Some(Violation::AboveMaximum {
                path: path.to_string(),
                max,
                actual: number.clone(),
            });
        }
    }

    None
}

fn mismatch(path: &str, expected: ValueKind, value: &Value) -> Violation {
    Violation::TypeMismatch {
        path: path.to_string(),
        expected,
        actual: ValueKind::of(value),
    }
}

/// Strings render bare, everything else as JSON text.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ─── Validator ───────────────────────────────────────────────────────

/// A raw configuration document and the operations that validate it.
///
/// The document is never modified; defaults are only ever applied to the
/// copies returned by [`ConfigValidator::validated_config`].
#[derive(Debug, Clone)]
pub struct ConfigValidator {
    config: Value,
}

impl ConfigValidator {
    /// Validator over the given raw configuration.
    pub fn new(config: Value) -> Self {
        Self { config }
    }

    /// The raw configuration document.
    pub fn config(&self) -> &Value {
        &self.config
    }

    /// The section stored under `key`, or the whole document for `None`.
    pub fn section(&self, key: Option<&str>) -> Option<&Value> {
        match key {
            Some(key) => self.config.get(key),
            None => Some(&self.config),
        }
    }

    /// Validate the section at `section_key` (or the whole document).
    pub fn validate_schema(
        &self,
        node: &SchemaNode,
        section_key: Option<&str>,
    ) -> ValidationResult {
        let violations = check(node, self.section(section_key));
        tracing::debug!(
            section = node.name(),
            violations = violations.len(),
            "validated configuration section"
        );
        ValidationResult::from_violations(violations)
    }

    /// Validate, then build the defaulted copy of the section.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ValidationFailed`] carrying every
    /// violation when the section does not conform to `node`.
    pub fn validated_config(
        &self,
        node: &SchemaNode,
        section_key: Option<&str>,
    ) -> Result<ValidatedConfig, ValidationError> {
        let result = self.validate_schema(node, section_key);
        if !result.is_valid() {
            return Err(ValidationError::ValidationFailed {
                schema_name: node.name().to_string(),
                violations: result,
            });
        }
        Ok(materialize(node, self.section(section_key)))
    }

    /// Validate every top-level section of `root` against the section of
    /// the same name. Never stops early: all sections are checked.
    pub fn validate_root_schema(&self, root: &RootSchema) -> ValidationResult {
        let mut result = ValidationResult::default();
        for node in &root.properties {
            result.merge(self.validate_schema(node, Some(node.name())));
        }
        result
    }
}

impl From<Value> for ConfigValidator {
    fn from(config: Value) -> Self {
        Self::new(config)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use cfgval_core::{BooleanNode, ObjectNode};
    use proptest::prelude::*;

    /// Strategy for arbitrary JSON-shaped values.
    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-z]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn section_schema() -> SchemaNode {
        ObjectNode::new(
            "svc",
            vec![
                StringNode::new("name").min_length(2).into(),
                NumberNode::new("port").with_default(80).range(1.0, 65535.0).into(),
                BooleanNode::new("debug").with_default(false).into(),
                ObjectNode::new("tls", vec![BooleanNode::new("enabled").with_default(true).into()])
                    .into(),
            ],
        )
        .into()
    }

    proptest! {
        /// Every violation path is rooted at the section name.
        #[test]
        fn violation_paths_rooted_at_section(value in json_value()) {
            for violation in check(&section_schema(), Some(&value)) {
                prop_assert!(violation.path().starts_with("svc"), "bad path: {}", violation.path());
            }
        }

        /// Any non-number value for a number property is a type mismatch.
        #[test]
        fn non_numbers_rejected_by_number_nodes(value in json_value()) {
            prop_assume!(!value.is_number());
            let node: SchemaNode = NumberNode::new("port").into();
            let violations = validate_property_type(&node, &value, "svc.port");
            prop_assert_eq!(violations.len(), 1);
            let is_mismatch = matches!(
                violations[0],
                Violation::TypeMismatch { expected: ValueKind::Number, .. }
            );
            prop_assert!(is_mismatch);
        }

        /// Materializing an already materialized section changes nothing.
        #[test]
        fn materialize_is_idempotent(
            entries in prop::collection::btree_map("[a-z]{1,6}", json_value(), 0..6)
        ) {
            let section = Value::Object(entries.into_iter().collect());
            let schema = section_schema();
            let once = materialize(&schema, Some(&section));
            let twice = materialize(&schema, Some(&once.to_json()));
            prop_assert_eq!(once, twice);
        }
    }
}
