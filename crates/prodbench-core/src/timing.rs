//! Query timing, duration formatting and speedup

use std::time::{Duration, Instant};

use crate::error::TimingError;
use crate::store::Store;

/// Outcome of timing one query: elapsed wall-clock time, or why it failed
pub type Measurement = std::result::Result<Duration, TimingError>;

/// Time `sql` in its own transaction, covering execution and commit.
///
/// A store error is returned as a [`TimingError`] for the caller to record;
/// it never aborts the sweep.
pub fn time_query(store: &mut dyn Store, sql: &str) -> Measurement {
    let start = Instant::now();
    match store.run_query(sql) {
        Ok(rows) => {
            let elapsed = start.elapsed();
            tracing::trace!(?elapsed, rows, sql, "query timed");
            Ok(elapsed)
        }
        Err(e) => {
            tracing::warn!(error = %e, sql, "query failed, measurement discarded");
            Err(TimingError::new(e))
        }
    }
}

/// Render a duration with two decimals in μs, ms or s
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs_f64();
    if seconds < 0.001 {
        format!("{:.2} μs", seconds * 1_000_000.0)
    } else if seconds < 1.0 {
        format!("{:.2} ms", seconds * 1_000.0)
    } else {
        format!("{:.2} s", seconds)
    }
}

/// `baseline / indexed`, only when both measurements are valid and the
/// indexed run took a non-zero time
pub fn speedup(baseline: &Measurement, indexed: &Measurement) -> Option<f64> {
    match (baseline, indexed) {
        (Ok(base), Ok(idx)) if !idx.is_zero() => Some(base.as_secs_f64() / idx.as_secs_f64()),
        _ => None,
    }
}

/// Parenthesised speedup suffix for a result line
pub fn format_speedup(speedup: Option<f64>) -> String {
    match speedup {
        Some(ratio) => format!("({:.2}x speedup)", ratio),
        None => "(speedup n/a)".to_string(),
    }
}
