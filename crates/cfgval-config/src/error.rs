//! Errors raised while loading schemas or resolving configuration.

use cfgval_core::SchemaError;
use cfgval_schema::{ValidationError, ValidationResult};
use thiserror::Error;

/// Error from the configuration layer.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A schema file could not be read or parsed.
    #[error("schema load error for '{path}': {reason}")]
    SchemaLoad {
        /// Path to the schema file.
        path: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The schema document is structurally invalid.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// One or more top-level sections failed validation.
    #[error("Configuration validation failed: {violations}")]
    Validation {
        /// Every violation across all sections.
        violations: ValidationResult,
    },

    /// A single section failed while being resolved.
    #[error(transparent)]
    Section(#[from] ValidationError),

    /// The requested section is not part of the resolved configuration.
    #[error("unknown configuration section '{0}'")]
    UnknownSection(String),

    /// A resolved section does not fit the caller's type.
    #[error("section '{section}' could not be deserialized: {reason}")]
    Deserialize {
        /// Section name.
        section: String,
        /// Deserializer diagnostic.
        reason: String,
    },
}
