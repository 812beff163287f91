//! # Basic Usage
//!
//! Declares a schema in code, resolves `config.json` (or the file named by
//! `CFGVAL_CONFIG`) against it, and prints the defaulted result.
//!
//! ```text
//! RUST_LOG=debug cargo run -p cfgval-config --example basic_usage
//! ```

use anyhow::Context;
use cfgval_config::configure_from_path;
use cfgval_core::{BooleanNode, EnumNode, NumberNode, ObjectNode, RootSchema, StringNode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct DatabaseSettings {
    host: String,
    port: u16,
    ssl: String,
}

fn schema() -> anyhow::Result<RootSchema> {
    Ok(RootSchema::new(
        "Example Application Configuration",
        vec![
            ObjectNode::new(
                "database",
                vec![
                    StringNode::new("host").required().described("Database host").into(),
                    NumberNode::new("port").with_default(5432).range(1.0, 65535.0).into(),
                    EnumNode::new("ssl", ["disable", "require", "verify-ca", "verify-full"])?
                        .with_default("disable")
                        .into(),
                ],
            )
            .required()
            .into(),
            ObjectNode::new(
                "app",
                vec![
                    NumberNode::new("port").with_default(3000).into(),
                    BooleanNode::new("debug").with_default(false).into(),
                ],
            )
            .into(),
        ],
    ))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let schema = schema()?;
    let resolved = configure_from_path(&schema, None).context("resolving configuration")?;

    let database: DatabaseSettings = resolved.section_as("database")?;
    tracing::info!(?database, "database settings");
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}
