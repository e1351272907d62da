//! Index benchmark runner
//!
//! Phases run strictly in order, each depending on the index state the
//! previous one left behind:
//!
//! 1. cleanup: drop leftover catalog indexes so the run starts bare
//! 2. baseline: time every query with no index
//! 3. one phase per index: create, time its relevant queries, drop
//! 4. combined: create every index in one transaction, time every query,
//!    drop them all together
//!
//! A failing query is recorded and the sweep moves on. Index DDL failures
//! are fatal, since the index state is then unknown.

use chrono::Utc;

use crate::catalog::{Catalog, IndexDescriptor};
use crate::error::{BenchError, Result};
use crate::report::{BenchReport, PhaseKind, PhaseReport, QueryResult};
use crate::store::Store;
use crate::timing::{speedup, time_query};

/// Index state the runner believes the store is in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseState {
    NoIndex,
    IndexCreated(String),
    QueriesTimed(String),
    IndexDropped(String),
    AllIndexesCreated,
    AllIndexesTimed,
    AllIndexesDropped,
}

impl PhaseState {
    /// Whether no catalog index should exist in this state
    fn is_bare(&self) -> bool {
        matches!(
            self,
            PhaseState::NoIndex | PhaseState::IndexDropped(_) | PhaseState::AllIndexesDropped
        )
    }
}

/// Streamed to the observer as the run progresses
#[derive(Debug)]
pub enum BenchEvent<'r> {
    PhaseStarted(&'r PhaseKind),
    QueryTimed {
        phase: &'r PhaseKind,
        result: &'r QueryResult,
    },
    PhaseFinished(&'r PhaseReport),
}

pub type Observer<'o> = &'o mut dyn FnMut(&BenchEvent<'_>);

pub struct BenchmarkRunner<'a> {
    store: &'a mut dyn Store,
    catalog: &'a Catalog,
    state: PhaseState,
}

impl<'a> BenchmarkRunner<'a> {
    pub fn new(store: &'a mut dyn Store, catalog: &'a Catalog) -> Self {
        Self {
            store,
            catalog,
            state: PhaseState::NoIndex,
        }
    }

    pub fn state(&self) -> &PhaseState {
        &self.state
    }

    fn transition(&mut self, next: PhaseState) {
        tracing::debug!(from = ?self.state, to = ?next, "phase transition");
        self.state = next;
    }

    fn require_bare(&self, phase: &str) -> Result<()> {
        if self.state.is_bare() {
            Ok(())
        } else {
            Err(BenchError::Other(format!(
                "{} phase requires no indexes, but state is {:?}",
                phase, self.state
            )))
        }
    }

    /// Run every phase and return the collected report
    pub fn run(&mut self, observer: Observer<'_>) -> Result<BenchReport> {
        self.catalog.validate()?;
        let started_at = Utc::now();
        let row_count = self.store.row_count()?;
        tracing::info!(row_count, backend = %self.store.backend(), "starting benchmark");

        self.cleanup()?;
        let baseline = self.run_baseline(observer)?;

        let catalog = self.catalog;
        let mut phases = Vec::with_capacity(catalog.indexes.len() + 1);
        for index in &catalog.indexes {
            phases.push(self.run_indexed_phase(index, &baseline, observer)?);
        }
        phases.push(self.run_combined_phase(&baseline, observer)?);

        Ok(BenchReport {
            started_at,
            backend: self.store.backend(),
            row_count,
            baseline,
            phases,
        })
    }

    /// Drop any catalog index left behind by an earlier, aborted run
    pub fn cleanup(&mut self) -> Result<()> {
        let drops: Vec<String> = self
            .catalog
            .indexes
            .iter()
            .map(IndexDescriptor::drop_if_exists_sql)
            .collect();
        let statements: Vec<&str> = drops.iter().map(String::as_str).collect();
        self.store
            .execute_ddl(&statements)
            .map_err(|e| BenchError::index_ddl("cleanup", e))?;
        self.transition(PhaseState::NoIndex);
        Ok(())
    }

    fn time_position(
        &mut self,
        position: usize,
        baseline: Option<&PhaseReport>,
        phase: &mut PhaseReport,
        observer: &mut dyn FnMut(&BenchEvent<'_>),
    ) {
        let query = &self.catalog.queries[position];
        let measurement = time_query(self.store, &query.sql);
        let speedup = baseline
            .and_then(|b| b.results.iter().find(|r| r.position == position))
            .and_then(|b| speedup(&b.measurement, &measurement));

        phase.results.push(QueryResult {
            position,
            key: query.key.clone(),
            label: query.label.clone(),
            measurement,
            speedup,
        });
        if let Some(result) = phase.results.last() {
            observer(&BenchEvent::QueryTimed {
                phase: &phase.phase,
                result,
            });
        }
    }

    /// Time every query with no index present
    #[tracing::instrument(skip_all)]
    pub fn run_baseline(&mut self, observer: Observer<'_>) -> Result<PhaseReport> {
        self.require_bare("baseline")?;

        let mut phase = PhaseReport::new(PhaseKind::Baseline);
        observer(&BenchEvent::PhaseStarted(&phase.phase));
        for position in 0..self.catalog.queries.len() {
            self.time_position(position, None, &mut phase, observer);
        }
        observer(&BenchEvent::PhaseFinished(&phase));
        Ok(phase)
    }

    /// Create one index, re-time only the queries it accelerates, drop it
    #[tracing::instrument(skip_all, fields(index = %index.name))]
    pub fn run_indexed_phase(
        &mut self,
        index: &IndexDescriptor,
        baseline: &PhaseReport,
        observer: Observer<'_>,
    ) -> Result<PhaseReport> {
        self.require_bare("indexed")?;

        let mut phase = PhaseReport::new(PhaseKind::Single {
            index: index.name.clone(),
            label: index.label.clone(),
        });
        observer(&BenchEvent::PhaseStarted(&phase.phase));

        self.store
            .execute_ddl(&[index.create_sql.as_str()])
            .map_err(|e| BenchError::index_ddl(&index.name, e))?;
        self.transition(PhaseState::IndexCreated(index.name.clone()));

        for position in self.catalog.relevant_queries(index) {
            self.time_position(position, Some(baseline), &mut phase, observer);
        }
        self.transition(PhaseState::QueriesTimed(index.name.clone()));

        self.store
            .execute_ddl(&[index.drop_sql.as_str()])
            .map_err(|e| BenchError::index_ddl(&index.name, e))?;
        self.verify_dropped(index)?;
        self.transition(PhaseState::IndexDropped(index.name.clone()));

        observer(&BenchEvent::PhaseFinished(&phase));
        Ok(phase)
    }

    /// Create every index at once, time every query, drop them together
    #[tracing::instrument(skip_all)]
    pub fn run_combined_phase(
        &mut self,
        baseline: &PhaseReport,
        observer: Observer<'_>,
    ) -> Result<PhaseReport> {
        self.require_bare("combined")?;

        let mut phase = PhaseReport::new(PhaseKind::Combined);
        observer(&BenchEvent::PhaseStarted(&phase.phase));

        let catalog = self.catalog;
        let creates: Vec<&str> = catalog
            .indexes
            .iter()
            .map(|i| i.create_sql.as_str())
            .collect();
        self.store
            .execute_ddl(&creates)
            .map_err(|e| BenchError::index_ddl("combined create", e))?;
        self.transition(PhaseState::AllIndexesCreated);

        for position in 0..catalog.queries.len() {
            self.time_position(position, Some(baseline), &mut phase, observer);
        }
        self.transition(PhaseState::AllIndexesTimed);

        let drops: Vec<&str> = catalog
            .indexes
            .iter()
            .map(|i| i.drop_sql.as_str())
            .collect();
        self.store
            .execute_ddl(&drops)
            .map_err(|e| BenchError::index_ddl("combined drop", e))?;
        for index in &catalog.indexes {
            self.verify_dropped(index)?;
        }
        self.transition(PhaseState::AllIndexesDropped);

        observer(&BenchEvent::PhaseFinished(&phase));
        Ok(phase)
    }

    fn verify_dropped(&mut self, index: &IndexDescriptor) -> Result<()> {
        if self.store.index_exists(&index.name)? {
            return Err(BenchError::index_ddl(
                &index.name,
                "still present after drop",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
