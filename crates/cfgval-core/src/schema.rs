//! # Schema Model
//!
//! The closed set of configuration property kinds. A schema is a tree of
//! [`SchemaNode`] values rooted in a [`RootSchema`]; every node names one
//! property and carries the constraints for its kind.
//!
//! ## Wire Format
//!
//! Schemas deserialize from the camelCase JSON shape used by schema
//! authors, discriminated by a `type` field:
//!
//! ```json
//! { "name": "port", "type": "number", "min": 1, "max": 65535, "defaultValue": 5432 }
//! ```
//!
//! ## Presence Invariant
//!
//! A property is either required or optional with an optional default.
//! [`Presence`] makes "required *and* defaulted" unrepresentable; schema
//! documents that declare both are rejected at parse time with
//! [`SchemaError::RequiredWithDefault`].

use std::collections::HashSet;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::SchemaError;

// ─── Presence ────────────────────────────────────────────────────────

/// Whether a property must be supplied, or what to use when it is not.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence<T> {
    /// The property must appear in the configuration.
    Required,
    /// The property may be omitted; `default` fills it in when declared.
    Optional {
        /// Value used when the property is absent.
        default: Option<T>,
    },
}

impl<T> Default for Presence<T> {
    fn default() -> Self {
        Self::Optional { default: None }
    }
}

impl<T> Presence<T> {
    /// Whether the property must be supplied.
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }

    /// The declared default, if any.
    pub fn default_value(&self) -> Option<&T> {
        match self {
            Self::Required => None,
            Self::Optional { default } => default.as_ref(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresenceRepr<T> {
    #[serde(default)]
    required: bool,
    default_value: Option<T>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PresenceReprRef<'a, T> {
    #[serde(skip_serializing_if = "is_false")]
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<&'a T>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Presence<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PresenceRepr::<T>::deserialize(deserializer)?;
        match (repr.required, repr.default_value) {
            (true, Some(_)) => Err(de::Error::custom(SchemaError::RequiredWithDefault)),
            (true, None) => Ok(Self::Required),
            (false, default) => Ok(Self::Optional { default }),
        }
    }
}

impl<T: Serialize> Serialize for Presence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PresenceReprRef {
            required: self.is_required(),
            default_value: self.default_value(),
        }
        .serialize(serializer)
    }
}

fn non_empty_enum<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let allowed = Vec::<String>::deserialize(deserializer)?;
    if allowed.is_empty() {
        return Err(de::Error::custom(SchemaError::EmptyEnum));
    }
    Ok(allowed)
}

// ─── Nodes ───────────────────────────────────────────────────────────

/// A string property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringNode {
    /// Property name, unique among its siblings.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Required flag or default value.
    #[serde(flatten)]
    pub presence: Presence<String>,
    /// Inclusive lower bound on the length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Inclusive upper bound on the length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression the value must match somewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Documentation examples.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// A numeric property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberNode {
    /// Property name, unique among its siblings.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Required flag or default value.
    #[serde(flatten)]
    pub presence: Presence<Number>,
    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Documentation examples.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Number>,
}

/// A boolean property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanNode {
    /// Property name, unique among its siblings.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Required flag or default value.
    #[serde(flatten)]
    pub presence: Presence<bool>,
    /// Documentation examples.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<bool>,
}

/// A string property restricted to a fixed, ordered set of literals.
///
/// The default and every example are expected to be members of the set;
/// the validator reports them as authoring errors when they are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumNode {
    /// Property name, unique among its siblings.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Required flag or default value.
    #[serde(flatten)]
    pub presence: Presence<String>,
    /// Allowed literals, in declaration order. Never empty.
    #[serde(rename = "enum", deserialize_with = "non_empty_enum")]
    pub allowed: Vec<String>,
    /// Documentation examples.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// A nested object property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectNode {
    /// Property name, unique among its siblings.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Required flag or default value.
    #[serde(flatten)]
    pub presence: Presence<Map<String, Value>>,
    /// Child properties, in declaration order.
    #[serde(default)]
    pub properties: Vec<SchemaNode>,
}

macro_rules! common_builders {
    ($($node:ty),+) => {$(
        impl $node {
            /// Mark the property as required, discarding any default.
            pub fn required(mut self) -> Self {
                self.presence = Presence::Required;
                self
            }

            /// Attach a human-readable description.
            pub fn described(mut self, description: impl Into<String>) -> Self {
                self.description = Some(description.into());
                self
            }
        }
    )+};
}

common_builders!(StringNode, NumberNode, BooleanNode, EnumNode, ObjectNode);

impl StringNode {
    /// Optional string property without constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            presence: Presence::default(),
            min_length: None,
            max_length: None,
            pattern: None,
            examples: Vec::new(),
        }
    }

    /// Optional with a default value.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.presence = Presence::Optional {
            default: Some(value.into()),
        };
        self
    }

    /// Inclusive minimum length.
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Inclusive maximum length.
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Regular expression constraint.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

impl NumberNode {
    /// Optional number property without bounds.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            presence: Presence::default(),
            min: None,
            max: None,
            examples: Vec::new(),
        }
    }

    /// Optional with a default value.
    pub fn with_default(mut self, value: impl Into<Number>) -> Self {
        self.presence = Presence::Optional {
            default: Some(value.into()),
        };
        self
    }

    /// Inclusive lower and upper bounds.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }
}

impl BooleanNode {
    /// Optional boolean property.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            presence: Presence::default(),
            examples: Vec::new(),
        }
    }

    /// Optional with a default value.
    pub fn with_default(mut self, value: bool) -> Self {
        self.presence = Presence::Optional {
            default: Some(value),
        };
        self
    }
}

impl EnumNode {
    /// Optional enum property over `allowed`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyEnum`] if `allowed` is empty.
    pub fn new<I, S>(name: impl Into<String>, allowed: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        if allowed.is_empty() {
            return Err(SchemaError::EmptyEnum);
        }
        Ok(Self {
            name: name.into(),
            description: None,
            presence: Presence::default(),
            allowed,
            examples: Vec::new(),
        })
    }

    /// Optional with a default value. Membership is not checked here.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.presence = Presence::Optional {
            default: Some(value.into()),
        };
        self
    }

    /// Documentation examples. Membership is not checked here.
    pub fn examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `candidate` is one of the allowed literals.
    pub fn allows(&self, candidate: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == candidate)
    }
}

impl ObjectNode {
    /// Optional object property with the given children.
    pub fn new(name: impl Into<String>, properties: Vec<SchemaNode>) -> Self {
        Self {
            name: name.into(),
            description: None,
            presence: Presence::default(),
            properties,
        }
    }

    /// Optional with a default map, used when the object is absent.
    pub fn with_default(mut self, value: Map<String, Value>) -> Self {
        self.presence = Presence::Optional {
            default: Some(value),
        };
        self
    }
}

// ─── Schema Node ─────────────────────────────────────────────────────

/// The kind discriminant of a [`SchemaNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// [`StringNode`].
    String,
    /// [`NumberNode`].
    Number,
    /// [`BooleanNode`].
    Boolean,
    /// [`EnumNode`].
    Enum,
    /// [`ObjectNode`].
    Object,
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Object => "object",
        };
        f.write_str(s)
    }
}

/// Schema-time description of one configuration property.
///
/// Every `match` on `SchemaNode` is exhaustive: adding a kind forces the
/// validator and the materializer to handle it at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaNode {
    /// String property.
    String(StringNode),
    /// Number property.
    Number(NumberNode),
    /// Boolean property.
    Boolean(BooleanNode),
    /// Enum property.
    Enum(EnumNode),
    /// Object property.
    Object(ObjectNode),
}

impl SchemaNode {
    /// Property name.
    pub fn name(&self) -> &str {
        match self {
            Self::String(node) => &node.name,
            Self::Number(node) => &node.name,
            Self::Boolean(node) => &node.name,
            Self::Enum(node) => &node.name,
            Self::Object(node) => &node.name,
        }
    }

    /// Human-readable description, if any.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::String(node) => node.description.as_deref(),
            Self::Number(node) => node.description.as_deref(),
            Self::Boolean(node) => node.description.as_deref(),
            Self::Enum(node) => node.description.as_deref(),
            Self::Object(node) => node.description.as_deref(),
        }
    }

    /// Whether the property must be supplied.
    pub fn is_required(&self) -> bool {
        match self {
            Self::String(node) => node.presence.is_required(),
            Self::Number(node) => node.presence.is_required(),
            Self::Boolean(node) => node.presence.is_required(),
            Self::Enum(node) => node.presence.is_required(),
            Self::Object(node) => node.presence.is_required(),
        }
    }

    /// Kind discriminant.
    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::String(_) => SchemaKind::String,
            Self::Number(_) => SchemaKind::Number,
            Self::Boolean(_) => SchemaKind::Boolean,
            Self::Enum(_) => SchemaKind::Enum,
            Self::Object(_) => SchemaKind::Object,
        }
    }

    /// The declared default rendered as a raw configuration value.
    pub fn default_json(&self) -> Option<Value> {
        match self {
            Self::String(node) => node.presence.default_value().cloned().map(Value::String),
            Self::Number(node) => node.presence.default_value().cloned().map(Value::Number),
            Self::Boolean(node) => node.presence.default_value().copied().map(Value::Bool),
            Self::Enum(node) => node.presence.default_value().cloned().map(Value::String),
            Self::Object(node) => node.presence.default_value().cloned().map(Value::Object),
        }
    }

    /// Child properties. Empty for every kind except populated objects.
    pub fn properties(&self) -> &[SchemaNode] {
        match self {
            Self::Object(node) => &node.properties,
            Self::String(_) | Self::Number(_) | Self::Boolean(_) | Self::Enum(_) => &[],
        }
    }
}

impl From<StringNode> for SchemaNode {
    fn from(node: StringNode) -> Self {
        Self::String(node)
    }
}

impl From<NumberNode> for SchemaNode {
    fn from(node: NumberNode) -> Self {
        Self::Number(node)
    }
}

impl From<BooleanNode> for SchemaNode {
    fn from(node: BooleanNode) -> Self {
        Self::Boolean(node)
    }
}

impl From<EnumNode> for SchemaNode {
    fn from(node: EnumNode) -> Self {
        Self::Enum(node)
    }
}

impl From<ObjectNode> for SchemaNode {
    fn from(node: ObjectNode) -> Self {
        Self::Object(node)
    }
}

// ─── Root Schema ─────────────────────────────────────────────────────

/// Top-level schema: one node per named configuration section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootSchema {
    /// Free-text description of the whole configuration.
    #[serde(default)]
    pub description: String,
    /// Top-level sections, in declaration order.
    #[serde(default)]
    pub properties: Vec<SchemaNode>,
}

impl RootSchema {
    /// Build a root schema from already-constructed sections.
    pub fn new(description: impl Into<String>, properties: Vec<SchemaNode>) -> Self {
        Self {
            description: description.into(),
            properties,
        }
    }

    /// Parse a root schema from a JSON value and check sibling names.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] for structurally invalid documents
    /// (including required-with-default and empty enums) and
    /// [`SchemaError::DuplicateProperty`] for repeated sibling names.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let schema: Self = serde_json::from_value(value)?;
        schema.ensure_unique_names()?;
        Ok(schema)
    }

    /// Look up a top-level section by name.
    pub fn section(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.iter().find(|node| node.name() == name)
    }

    /// Verify that sibling property names are unique at every level.
    pub fn ensure_unique_names(&self) -> Result<(), SchemaError> {
        ensure_unique_names("<root>", &self.properties)
    }
}

fn ensure_unique_names(parent: &str, nodes: &[SchemaNode]) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.name()) {
            return Err(SchemaError::DuplicateProperty {
                parent: parent.to_string(),
                name: node.name().to_string(),
            });
        }
        if !node.properties().is_empty() {
            let path = if parent == "<root>" {
                node.name().to_string()
            } else {
                format!("{parent}.{}", node.name())
            };
            ensure_unique_names(&path, node.properties())?;
        }
    }
    Ok(())
}
