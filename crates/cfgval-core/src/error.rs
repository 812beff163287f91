//! # Error Types — Schema Construction Errors
//!
//! Errors raised while building or parsing a schema. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Violations found while validating a *configuration* are not errors in
//! this sense: they are collected as data by `cfgval-schema`. The types
//! here only cover schemas that cannot be represented at all.

use thiserror::Error;

/// Error produced when a schema document is malformed.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A property declared both `required: true` and a `defaultValue`.
    #[error("a property cannot be both required and carry a defaultValue")]
    RequiredWithDefault,

    /// An enum property declared no allowed values.
    #[error("enum property must declare at least one allowed value")]
    EmptyEnum,

    /// Two sibling properties share a name.
    #[error("duplicate property '{name}' in '{parent}'")]
    DuplicateProperty {
        /// Name of the object (or root schema) holding the duplicates.
        parent: String,
        /// The repeated property name.
        name: String,
    },

    /// The schema document could not be parsed.
    #[error("schema parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
