//! `prodbench load` command - bulk insert synthetic products
//!
//! Ctrl-C stops the load after the batch in flight commits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::{Cli, LoadArgs, OutputFormat};
use prodbench_core::config::BenchConfig;
use prodbench_core::error::Result;
use prodbench_core::loader::{LoadPlan, Loader};
use prodbench_core::store;
use prodbench_core::timing::format_duration;

/// Apply per-command overrides on top of the config file
fn apply_overrides(config: &mut BenchConfig, args: &LoadArgs) {
    if let Some(rows) = args.rows {
        config.load.rows = rows;
    }
    if let Some(batch_size) = args.batch_size {
        config.load.batch_size = batch_size;
    }
    if let Some(progress_every) = args.progress_every {
        config.load.progress_every = progress_every;
    }
    if args.seed.is_some() {
        config.load.seed = args.seed;
    }
    if args.keep_durability {
        config.load.relax_durability = false;
    }
}

/// Execute the load command
pub fn execute(cli: &Cli, mut config: BenchConfig, args: &LoadArgs) -> Result<()> {
    apply_overrides(&mut config, args);
    config.validate()?;

    let plan = LoadPlan::new(
        config.load.rows,
        config.load.batch_size,
        config.load.progress_every,
    )?;
    let rng = match config.load.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut store = store::connect(&config.store)?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = Arc::clone(&interrupted);
    let _ = ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::SeqCst);
    });

    let show_progress = cli.format == OutputFormat::Human && !cli.quiet;
    let mut on_progress = |processed: u64, _total: u64| {
        if show_progress {
            println!("Processed {} records...", processed);
        }
    };

    let summary = Loader::new(store.as_mut(), &config.vocabulary, rng)
        .with_relaxed_durability(config.load.relax_durability)
        .run(&plan, Some(interrupted.as_ref()), Some(&mut on_progress))?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "rows_inserted": summary.rows_inserted,
                "batches_committed": summary.batches_committed,
                "elapsed_ms": summary.elapsed.as_millis() as u64,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!(
                    "Inserted {} rows in {} batches ({})",
                    summary.rows_inserted,
                    summary.batches_committed,
                    format_duration(summary.elapsed)
                );
            }
            println!("Data insertion completed successfully!");
        }
    }
    Ok(())
}
