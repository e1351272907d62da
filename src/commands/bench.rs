//! `prodbench bench` command - index benchmark sweep
//!
//! Human output streams as each query is timed; failed queries are reported
//! on stderr and the sweep carries on. `--quiet` silences stdout but keeps
//! the stderr error lines. JSON output prints the whole report once the run
//! finishes.

use crate::cli::{BenchArgs, Cli, OutputFormat};
use prodbench_core::bench::{BenchEvent, BenchmarkRunner};
use prodbench_core::catalog::Catalog;
use prodbench_core::config::BenchConfig;
use prodbench_core::error::Result;
use prodbench_core::report::PhaseKind;
use prodbench_core::store;

/// Execute the bench command
pub fn execute(cli: &Cli, config: &BenchConfig, args: &BenchArgs) -> Result<()> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::for_backend(config.store.backend),
    };

    let mut store = store::connect(&config.store)?;

    let stream_human = cli.format == OutputFormat::Human && !cli.quiet;
    let mut observer = |event: &BenchEvent<'_>| match event {
        BenchEvent::PhaseStarted(kind) => {
            if stream_human {
                if **kind != PhaseKind::Baseline {
                    println!();
                }
                println!("{}", kind.header());
            }
        }
        BenchEvent::QueryTimed { phase, result } => {
            if let Err(e) = &result.measurement {
                eprintln!("error in query {}: {}", result.label, e);
            }
            if stream_human {
                println!("{}", result.line(**phase != PhaseKind::Baseline));
            }
        }
        BenchEvent::PhaseFinished(_) => {}
    };

    let report = BenchmarkRunner::new(store.as_mut(), &catalog).run(&mut observer)?;

    if cli.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    }
    Ok(())
}
