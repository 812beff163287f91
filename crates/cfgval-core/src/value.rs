//! # Value Kinds
//!
//! Classification of raw configuration values. Violation messages name
//! both the expected and the actual kind, so the classification and its
//! rendering live in one place.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of a JSON-shaped configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// JSON string.
    String,
    /// JSON number (integer or float).
    Number,
    /// JSON `true` / `false`.
    Boolean,
    /// JSON object.
    Object,
    /// JSON array. Never accepted by a schema, only reported.
    Array,
    /// JSON `null`.
    Null,
}

impl ValueKind {
    /// Classify a raw value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::Null => Self::Null,
        }
    }

    /// Lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }

    /// Name with its indefinite article, e.g. "an object".
    pub fn with_article(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Number => "a number",
            Self::Boolean => "a boolean",
            Self::Object => "an object",
            Self::Array => "an array",
            Self::Null => "null",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
