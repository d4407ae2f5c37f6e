//! Run results.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use vdbbench_clients::{Operation, TaskConfig};
use vdbbench_core::{CaseType, Db, IndexType};

/// Error messages kept per stage; the rest are only counted.
pub const MAX_RECORDED_ERRORS: usize = 10;

/// Stages of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Batched inserts
    Load,
    /// Index build after loading
    Optimize,
    /// One query at a time
    SerialSearch,
    /// Worker threads at each concurrency level
    ConcurrentSearch,
}

/// A stage that did not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedStage {
    /// The stage
    pub stage: Stage,
    /// The unsupported operation it needed
    pub operation: Operation,
}

/// Load stage results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadStats {
    /// Vectors stored
    pub inserted: usize,
    /// Vectors not stored
    pub failed: usize,
    /// Seconds spent inserting
    pub insert_secs: f64,
    /// Seconds spent optimizing, when it ran
    pub optimize_secs: Option<f64>,
    /// First few failures
    pub errors: Vec<String>,
}

/// Serial search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchStats {
    /// Queries answered
    pub queries: usize,
    /// Queries that failed
    pub failed: usize,
    /// Mean latency of answered queries
    pub mean_latency_ms: f64,
    /// 99th percentile latency of answered queries
    pub p99_latency_ms: f64,
    /// First few failures
    pub errors: Vec<String>,
}

/// Results of one concurrency level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConcurrentStats {
    /// Worker count
    pub concurrency: usize,
    /// Queries answered
    pub queries: usize,
    /// Queries that failed
    pub failed: usize,
    /// Answered queries per second
    pub qps: f64,
    /// 99th percentile latency of answered queries
    pub p99_latency_ms: f64,
    /// First few failures
    pub errors: Vec<String>,
}

/// Everything one run measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Run id
    pub run_id: Uuid,
    /// Backend
    pub db: Db,
    /// Report label
    pub db_label: String,
    /// Index type
    pub index_type: IndexType,
    /// Dataset case
    pub case_type: CaseType,
    /// Start of the run
    pub started_at: DateTime<Utc>,
    /// End of the run
    pub finished_at: Option<DateTime<Utc>>,
    /// Load stage, when it ran
    pub load: Option<LoadStats>,
    /// Serial search, when it ran
    pub serial_search: Option<SearchStats>,
    /// Concurrent search, one entry per level
    pub concurrent_search: Vec<ConcurrentStats>,
    /// Stages skipped for lack of support
    pub skipped: Vec<SkippedStage>,
}

impl RunSummary {
    /// An empty summary for `task`, started now.
    pub fn start(task: &TaskConfig) -> Self {
        Self {
            run_id: task.run_id,
            db: task.db,
            db_label: task.db_label.clone(),
            index_type: task.index_type,
            case_type: task.common.case_type,
            started_at: Utc::now(),
            finished_at: None,
            load: None,
            serial_search: None,
            concurrent_search: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Record a stage that could not run.
    pub fn skip(&mut self, stage: Stage, operation: Operation) {
        self.skipped.push(SkippedStage { stage, operation });
    }

    /// Check if a stage was skipped
    pub fn was_skipped(&self, stage: Stage) -> bool {
        self.skipped.iter().any(|s| s.stage == stage)
    }

    /// Stamp the end time.
    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }
}

/// Append `error` unless enough are already recorded.
pub(crate) fn record_error(errors: &mut Vec<String>, error: impl ToString) {
    if errors.len() < MAX_RECORDED_ERRORS {
        errors.push(error.to_string());
    }
}

/// Latency digest of a set of samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Latencies {
    pub mean_ms: f64,
    pub p99_ms: f64,
}

impl Latencies {
    pub(crate) fn of(samples: &mut [Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        samples.sort_unstable();
        let total: f64 = samples.iter().map(|d| d.as_secs_f64()).sum();
        let rank = ((samples.len() as f64) * 0.99).ceil() as usize;
        let p99 = samples[rank.clamp(1, samples.len()) - 1];
        Self {
            mean_ms: total * 1000.0 / samples.len() as f64,
            p99_ms: p99.as_secs_f64() * 1000.0,
        }
    }
}
