//! Batched bulk load of synthetic products
//!
//! Rows are inserted through one prepared statement and committed every
//! `batch_size` rows (the tail batch takes the remainder). Batches run
//! strictly in sequence; a failed batch rolls back and stops the load.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::Rng;

use crate::error::{BenchError, Result};
use crate::product::Product;
use crate::store::Store;
use crate::trace_time;
use crate::vocabulary::Vocabulary;

/// How many rows to load and how to slice them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadPlan {
    pub rows: u64,
    pub batch_size: u64,
    pub progress_every: u64,
}

impl LoadPlan {
    pub fn new(rows: u64, batch_size: u64, progress_every: u64) -> Result<Self> {
        if batch_size == 0 {
            crate::bail_invalid!("batch size", "0 (must be at least 1)");
        }
        if progress_every == 0 {
            crate::bail_invalid!("progress interval", "0 (must be at least 1)");
        }
        Ok(Self {
            rows,
            batch_size,
            progress_every,
        })
    }

    /// Number of transactions the load commits
    pub fn batch_count(&self) -> u64 {
        self.rows.div_ceil(self.batch_size)
    }

    /// `(batch_start, batch_len)` for every batch, in order
    pub fn batches(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        (0..self.rows)
            .step_by(self.batch_size as usize)
            .map(move |start| (start, self.batch_size.min(self.rows - start)))
    }
}

/// What a finished load did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_inserted: u64,
    pub batches_committed: u64,
    pub elapsed: Duration,
}

/// Progress callback: `(rows_processed, rows_total)`
pub type ProgressFn<'p> = &'p mut dyn FnMut(u64, u64);

/// Drives one load over a borrowed store
pub struct Loader<'a, R: Rng> {
    store: &'a mut dyn Store,
    vocab: &'a Vocabulary,
    rng: R,
    relax_durability: bool,
}

impl<'a, R: Rng> Loader<'a, R> {
    pub fn new(store: &'a mut dyn Store, vocab: &'a Vocabulary, rng: R) -> Self {
        Self {
            store,
            vocab,
            rng,
            relax_durability: true,
        }
    }

    /// Keep the store's normal durability for this load
    pub fn with_relaxed_durability(mut self, relax: bool) -> Self {
        self.relax_durability = relax;
        self
    }

    /// Insert `plan.rows` rows.
    ///
    /// `interrupt` is checked between batches only, so an interrupted load
    /// keeps every batch committed so far and never leaves a partial one.
    #[tracing::instrument(skip(self, interrupt, progress), fields(rows = plan.rows, batch_size = plan.batch_size))]
    pub fn run(
        &mut self,
        plan: &LoadPlan,
        interrupt: Option<&AtomicBool>,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<LoadSummary> {
        self.vocab.validate()?;

        if self.relax_durability {
            self.store.relax_durability()?;
        }

        let result = self.prepare_and_load(plan, interrupt, progress);

        if self.relax_durability {
            if let Err(e) = self.store.restore_durability() {
                if result.is_ok() {
                    return Err(e);
                }
                tracing::warn!(error = %e, "failed to restore durability after failed load");
            }
        }

        result
    }

    fn prepare_and_load(
        &mut self,
        plan: &LoadPlan,
        interrupt: Option<&AtomicBool>,
        mut progress: Option<ProgressFn<'_>>,
    ) -> Result<LoadSummary> {
        let start = Instant::now();
        self.store.prepare_insert()?;

        let mut inserted = 0;
        let mut committed = 0;

        for (batch_start, batch_len) in plan.batches() {
            if interrupt.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
                tracing::info!(
                    inserted,
                    total = plan.rows,
                    "load interrupted, committed batches kept"
                );
                return Err(BenchError::Interrupted);
            }

            self.load_batch(batch_start, batch_len)?;
            committed += 1;

            let before = inserted;
            inserted += batch_len;

            if inserted / plan.progress_every > before / plan.progress_every {
                tracing::info!(inserted, total = plan.rows, "load progress");
                if let Some(cb) = progress.as_mut() {
                    cb(inserted, plan.rows);
                }
            }
        }

        Ok(LoadSummary {
            rows_inserted: inserted,
            batches_committed: committed,
            elapsed: start.elapsed(),
        })
    }

    /// Synthesize `batch_len` rows and commit them as one transaction
    pub fn load_batch(&mut self, batch_start: u64, batch_len: u64) -> Result<()> {
        let start = Instant::now();
        let rows: Vec<Product> = (0..batch_len)
            .map(|_| Product::synthesize(self.vocab, &mut self.rng))
            .collect();

        self.store.insert_batch(&rows)?;

        tracing::debug!(batch_start, batch_len, "batch committed");
        trace_time!(start, "load_batch", batch_start = batch_start);
        Ok(())
    }
}
