use super::*;
use crate::loader::{LoadPlan, Loader};
use crate::store::testing::{Call, RecordingStore};
use crate::store::SqliteStore;
use crate::vocabulary::Vocabulary;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn ignore(_: &BenchEvent<'_>) {}

fn ddl_calls(store: &RecordingStore) -> Vec<Vec<String>> {
    store
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Ddl(statements) => Some(statements.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_full_run_phase_order_and_lifecycle() {
    let catalog = Catalog::postgres();
    let mut store = RecordingStore::new();

    let report = {
        let mut runner = BenchmarkRunner::new(&mut store, &catalog);
        let report = runner.run(&mut ignore).unwrap();
        assert_eq!(runner.state(), &PhaseState::AllIndexesDropped);
        report
    };

    assert_eq!(report.baseline.results.len(), 9);
    assert_eq!(report.phases.len(), 4);
    assert_eq!(report.phases[0].results.len(), 3);
    assert_eq!(report.phases[1].results.len(), 3);
    assert_eq!(report.phases[2].results.len(), 3);
    assert_eq!(report.phases[3].phase, PhaseKind::Combined);
    assert_eq!(report.phases[3].results.len(), 9);
    assert!(store.indexes.is_empty());

    let ddl = ddl_calls(&store);
    // cleanup, 3 x (create, drop), combined create, combined drop
    assert_eq!(ddl.len(), 1 + 6 + 2);
    assert!(ddl[0].iter().all(|s| s.starts_with("DROP INDEX IF EXISTS")));
    assert_eq!(ddl[1], vec![catalog.indexes[0].create_sql.clone()]);
    assert_eq!(ddl[2], vec![catalog.indexes[0].drop_sql.clone()]);
    assert_eq!(ddl[7].len(), 3);
    assert_eq!(ddl[8].len(), 3);
}

#[test]
fn test_indexed_phase_only_times_relevant_queries() {
    let catalog = Catalog::postgres();
    let mut store = RecordingStore::new();
    let mut runner = BenchmarkRunner::new(&mut store, &catalog);

    let baseline = runner.run_baseline(&mut ignore).unwrap();
    let phase = runner
        .run_indexed_phase(&catalog.indexes[1], &baseline, &mut ignore)
        .unwrap();
    assert_eq!(runner.state(), &PhaseState::IndexDropped("idx_products_name_gin".into()));

    let keys: Vec<&str> = phase.results.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["name_word", "name_phrase", "name_regex"]);
    assert!(!store.index_exists("idx_products_name_gin").unwrap());

    // 9 baseline queries + 3 relevant ones
    assert_eq!(store.queries().len(), 12);
}

#[test]
fn test_failed_query_is_recorded_and_sweep_continues() {
    let catalog = Catalog::postgres();
    let mut store = RecordingStore::new();
    store.fail_query_containing = Some("name ~".to_string());

    let report = BenchmarkRunner::new(&mut store, &catalog)
        .run(&mut ignore)
        .unwrap();

    let regex = &report.baseline.results[5];
    assert_eq!(regex.key, "name_regex");
    assert!(regex.measurement.is_err());
    assert_eq!(report.baseline.failures(), 1);

    let gin_phase = &report.phases[1];
    let regex_indexed = &gin_phase.results[2];
    assert!(regex_indexed.measurement.is_err());
    assert_eq!(regex_indexed.speedup, None);

    // Every other query still measured, in every phase
    let combined = &report.phases[3];
    assert_eq!(combined.failures(), 1);
    assert!(combined
        .results
        .iter()
        .filter(|r| r.key != "name_regex")
        .all(|r| r.measurement.is_ok()));
    assert!(store.indexes.is_empty());
}

#[test]
fn test_speedups_positive_when_both_valid() {
    let catalog = Catalog::postgres();
    let mut store = RecordingStore::new();

    let report = BenchmarkRunner::new(&mut store, &catalog)
        .run(&mut ignore)
        .unwrap();

    for phase in &report.phases {
        for result in &phase.results {
            if let Some(ratio) = result.speedup {
                assert!(ratio > 0.0, "{:?}", result);
            }
        }
    }
    assert!(report.baseline.results.iter().all(|r| r.speedup.is_none()));
}

#[test]
fn test_ddl_failure_is_fatal() {
    let catalog = Catalog::postgres();
    let mut store = RecordingStore::new();
    store.fail_ddl_containing = Some("gin_trgm_ops".to_string());

    let err = BenchmarkRunner::new(&mut store, &catalog)
        .run(&mut ignore)
        .unwrap_err();

    match err {
        BenchError::IndexDdl { index, .. } => assert_eq!(index, "idx_products_name_gin"),
        other => panic!("unexpected error: {:?}", other),
    }
    // The B-tree phase completed and cleaned up before the failure
    assert!(!store.indexes.contains("idx_products_price"));
}

#[test]
fn test_cleanup_removes_leftover_indexes() {
    let catalog = Catalog::postgres();
    let mut store = RecordingStore::new();
    store
        .execute_ddl(&[catalog.indexes[2].create_sql.as_str()])
        .unwrap();
    assert!(store.index_exists("idx_products_id_brin").unwrap());

    BenchmarkRunner::new(&mut store, &catalog)
        .cleanup()
        .unwrap();
    assert!(store.indexes.is_empty());
}

#[test]
fn test_observer_sees_events_in_order() {
    let catalog = Catalog::postgres();
    let mut store = RecordingStore::new();
    let mut headers = Vec::new();
    let mut timed = 0;
    let mut observer = |event: &BenchEvent<'_>| match event {
        BenchEvent::PhaseStarted(kind) => headers.push(kind.header()),
        BenchEvent::QueryTimed { .. } => timed += 1,
        BenchEvent::PhaseFinished(_) => {}
    };

    BenchmarkRunner::new(&mut store, &catalog)
        .run(&mut observer)
        .unwrap();

    assert_eq!(
        headers,
        vec![
            "=== Baseline (no indexes) ===",
            "=== B-tree index on price ===",
            "=== GIN index on name (trigrams) ===",
            "=== BRIN index on product_id ===",
            "=== All indexes together ===",
        ]
    );
    assert_eq!(timed, 9 + 3 + 3 + 3 + 9);
}

#[test]
fn test_indexed_phase_refuses_when_index_present() {
    let catalog = Catalog::postgres();
    let mut store = RecordingStore::new();
    let mut runner = BenchmarkRunner::new(&mut store, &catalog);
    let baseline = runner.run_baseline(&mut ignore).unwrap();
    runner.transition(PhaseState::IndexCreated("idx_products_price".into()));

    assert!(runner
        .run_indexed_phase(&catalog.indexes[1], &baseline, &mut ignore)
        .is_err());
}

#[test]
fn test_sqlite_end_to_end() {
    let vocab = Vocabulary::default();
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.ensure_schema().unwrap();
    let plan = LoadPlan::new(100, 10, 1_000).unwrap();
    let summary = Loader::new(&mut store, &vocab, StdRng::seed_from_u64(8))
        .run(&plan, None, None)
        .unwrap();
    assert_eq!(summary.batches_committed, 10);

    let catalog = Catalog::sqlite();
    let report = BenchmarkRunner::new(&mut store, &catalog)
        .run(&mut ignore)
        .unwrap();

    assert_eq!(report.row_count, 100);
    assert_eq!(report.baseline.results.len(), 9);
    // SQLite has no `~` operator; only the regex query fails
    assert_eq!(report.baseline.failures(), 1);
    assert_eq!(report.baseline.results[5].key, "name_regex");
    for index in &catalog.indexes {
        assert!(!store.index_exists(&index.name).unwrap());
    }

    assert_eq!(report.phases[0].phase.header(), "=== Ordered index on price ===");
    assert_eq!(
        report.baseline.results[5].line(false),
        "GIN: trigram word match: failed"
    );
}
