//! Load throughput budget for the SQLite backend

mod support;

use std::time::Instant;
use tempfile::tempdir;

use crate::support::{init_sqlite, prodbench_sqlite, query_i64};

#[test]
fn test_load_50k_rows_performance() {
    let dir = tempdir().unwrap();
    init_sqlite(dir.path());

    let start = Instant::now();
    prodbench_sqlite(dir.path())
        .args(["--quiet", "load", "--rows", "50000", "--batch-size", "10000"])
        .assert()
        .success();
    let elapsed = start.elapsed();

    assert_eq!(query_i64(dir.path(), "SELECT COUNT(*) FROM Products"), 50_000);

    // Performance budget: <30s even for debug builds
    assert!(
        elapsed.as_secs() < 30,
        "Loading 50k rows took {:?}, budget is <30s",
        elapsed
    );

    println!("Loaded 50k rows in {:?} (budget: <30s)", elapsed);
}
