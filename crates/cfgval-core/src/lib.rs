//! # cfgval-core — Schema Model
//!
//! Defines the declarative schema that configuration is validated
//! against: a closed set of five property kinds (string, number,
//! boolean, enum, object) arranged as a tree under a [`RootSchema`].
//!
//! ## Key Design Principles
//!
//! 1. **Closed sum type.** [`SchemaNode`] is an enum with exhaustive
//!    `match` everywhere. Adding a kind is a compile-time exercise.
//!
//! 2. **Required xor default.** [`Presence`] cannot express a property
//!    that is both required and defaulted.
//!
//! 3. **No behavior.** This crate only describes schemas. Validation and
//!    default materialization live in `cfgval-schema`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cfgval-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod schema;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::SchemaError;
pub use schema::{
    BooleanNode, EnumNode, NumberNode, ObjectNode, Presence, RootSchema, SchemaKind, SchemaNode,
    StringNode,
};
pub use value::ValueKind;
