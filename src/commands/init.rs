//! `prodbench init` command - create the Products table
//!
//! Idempotent: an existing table is left untouched.

use crate::cli::{Cli, OutputFormat};
use prodbench_core::config::BenchConfig;
use prodbench_core::error::Result;
use prodbench_core::store;

/// Execute the init command
pub fn execute(cli: &Cli, config: &BenchConfig) -> Result<()> {
    let mut store = store::connect(&config.store)?;
    store.ensure_schema()?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "backend": config.store.backend,
                "message": "Products table ready",
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!("Products table ready ({})", config.store.backend);
            }
        }
    }
    Ok(())
}
