//! # cfgval-schema — Configuration Validation Engine
//!
//! Validates raw JSON configuration against a `cfgval-core` schema and
//! produces a defaulted copy of each section.
//!
//! ## Validation (`validate`)
//!
//! - [`check`] — pure, collects every [`Violation`] in a section.
//! - [`ConfigValidator::validate_schema`] — checks one section of a stored
//!   document, or the whole document.
//! - [`ConfigValidator::validate_root_schema`] — checks every top-level
//!   section of a [`cfgval_core::RootSchema`] without stopping early.
//! - [`ConfigValidator::validated_config`] — validates, then materializes;
//!   the only operation that raises on violations.
//!
//! ## Materialization (`materialize`)
//!
//! [`materialize()`] resolves each declared property to its raw value, its
//! default, or an explicit absent marker. It returns a new value and
//! leaves the input untouched.
//!
//! ## Crate Policy
//!
//! - Depends only on `cfgval-core` internally.
//! - No I/O. Loading configuration from disk is `cfgval-config`'s job.

pub mod materialize;
pub mod validate;
pub mod violation;

pub use materialize::{materialize, ValidatedConfig};
pub use validate::{
    check, validate_enum_property, validate_property_type, ConfigValidator, ValidationError,
};
pub use violation::{ValidationResult, Violation};
