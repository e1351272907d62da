//! Benchmark results and their human/JSON rendering

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::config::Backend;
use crate::timing::{format_duration, format_speedup, Measurement};

/// Which index configuration a phase measured
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseKind {
    /// No indexes present
    Baseline,
    /// Exactly one index present
    Single { index: String, label: String },
    /// Every catalog index present together
    Combined,
}

impl PhaseKind {
    /// Section header printed before the phase's results
    pub fn header(&self) -> String {
        match self {
            PhaseKind::Baseline => "=== Baseline (no indexes) ===".to_string(),
            PhaseKind::Single { label, .. } => format!("=== {} ===", label),
            PhaseKind::Combined => "=== All indexes together ===".to_string(),
        }
    }
}

/// One timed query within a phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Position of the query in the catalog
    pub position: usize,
    pub key: String,
    pub label: String,
    #[serde(serialize_with = "serialize_measurement")]
    pub measurement: Measurement,
    /// Relative to the baseline; `None` in the baseline phase itself or when
    /// either side failed
    pub speedup: Option<f64>,
}

impl QueryResult {
    /// `label: duration`, plus the speedup suffix outside the baseline
    pub fn line(&self, with_speedup: bool) -> String {
        match &self.measurement {
            Ok(elapsed) if with_speedup => format!(
                "{}: {} {}",
                self.label,
                format_duration(*elapsed),
                format_speedup(self.speedup)
            ),
            Ok(elapsed) => format!("{}: {}", self.label, format_duration(*elapsed)),
            Err(_) => format!("{}: failed", self.label),
        }
    }
}

fn serialize_measurement<S: Serializer>(
    measurement: &Measurement,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Repr<'a> {
        elapsed_us: Option<f64>,
        error: Option<&'a str>,
    }

    let repr = match measurement {
        Ok(elapsed) => Repr {
            elapsed_us: Some(elapsed.as_nanos() as f64 / 1_000.0),
            error: None,
        },
        Err(e) => Repr {
            elapsed_us: None,
            error: Some(e.reason.as_str()),
        },
    };
    repr.serialize(serializer)
}

/// All results of one phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseReport {
    pub phase: PhaseKind,
    pub results: Vec<QueryResult>,
}

impl PhaseReport {
    pub fn new(phase: PhaseKind) -> Self {
        Self {
            phase,
            results: Vec::new(),
        }
    }

    pub fn failures(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.measurement.is_err())
            .count()
    }
}

/// Full outcome of a benchmark run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    pub started_at: DateTime<Utc>,
    pub backend: Backend,
    pub row_count: i64,
    pub baseline: PhaseReport,
    /// Per-index phases in declaration order, then the combined phase
    pub phases: Vec<PhaseReport>,
}

impl BenchReport {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}
