//! Command dispatch logic for prodbench

use crate::cli::{Cli, Commands};
use prodbench_core::config::BenchConfig;
use prodbench_core::error::Result;
use tracing::debug;

use super::{bench, init, load};

/// Config file values with global CLI overrides applied
pub fn resolve_config(cli: &Cli) -> Result<BenchConfig> {
    let mut config = BenchConfig::discover(cli.config.as_deref())?;

    if let Some(backend) = cli.backend {
        config.store.backend = backend;
    }
    if let Some(url) = &cli.url {
        config.store.url = url.clone();
    }
    if let Some(path) = &cli.database {
        config.store.path = path.clone();
    }

    Ok(config)
}

pub fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    debug!(backend = %config.store.backend, "resolved config");

    match &cli.command {
        Commands::Init => init::execute(cli, &config),
        Commands::Load(args) => load::execute(cli, config, args),
        Commands::Bench(args) => bench::execute(cli, &config, args),
    }
}
