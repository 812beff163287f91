//! # cfgval-config — Configuration Sources & Resolution
//!
//! The I/O edge around the validation engine.
//!
//! - [`source`] finds the configuration file (explicit path, then
//!   `CFGVAL_CONFIG`, then `config.json` in the working directory) and
//!   reads it as JSON or YAML. Missing or broken files degrade to an empty
//!   document with a warning.
//! - [`adapter`] validates a whole [`cfgval_core::RootSchema`] and
//!   resolves every section, failing loudly with every violation.
//!
//! ## Crate Policy
//!
//! - All filesystem and environment access lives here, never in
//!   `cfgval-schema`.
//! - Logging goes through `tracing`; installing a subscriber is the
//!   binary's job.

pub mod adapter;
pub mod error;
pub mod source;

pub use adapter::{configure, configure_from_path, ResolvedConfig};
pub use error::ConfigError;
pub use source::{
    load_config, load_root_schema, read_config_file, resolve_config_path, ConfigOrigin,
    LoadStatus, LoadedConfig, DEFAULT_CONFIG_FILENAME, ENV_CONFIG_PATH,
};
