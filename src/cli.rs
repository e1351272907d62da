//! CLI argument parsing for prodbench
//!
//! Global flags select the store and output; subcommands pick the pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use prodbench_core::config::Backend;

/// Prodbench - synthetic product loader and index benchmark
#[derive(Parser, Debug)]
#[command(name = "prodbench")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: $PRODBENCH_CONFIG_DIR or the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store backend
    #[arg(long, global = true, value_parser = parse_backend)]
    pub backend: Option<Backend>,

    /// PostgreSQL connection URI
    #[arg(long, global = true, env = "PRODBENCH_DATABASE_URL", hide_env_values = true)]
    pub url: Option<String>,

    /// SQLite database file
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (overrides --verbose)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the Products table if it does not exist
    Init,

    /// Insert synthetic products in batched transactions
    Load(LoadArgs),

    /// Time the query set without indexes, per index, and with all indexes
    Bench(BenchArgs),
}

#[derive(Args, Debug, Default)]
pub struct LoadArgs {
    /// Total rows to insert
    #[arg(long)]
    pub rows: Option<u64>,

    /// Rows per committed transaction
    #[arg(long)]
    pub batch_size: Option<u64>,

    /// Print progress every N rows
    #[arg(long)]
    pub progress_every: Option<u64>,

    /// Seed for reproducible rows
    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep synchronous commit on while loading
    #[arg(long)]
    pub keep_durability: bool,
}

#[derive(Args, Debug, Default)]
pub struct BenchArgs {
    /// TOML file with custom queries and indexes
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines (default)
    #[default]
    Human,
    /// JSON for machine consumption
    Json,
}

fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse::<Backend>().map_err(|e| e.to_string())
}
