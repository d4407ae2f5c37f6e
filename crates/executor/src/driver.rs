//! Benchmark lifecycle.
//!
//! A [`Driver`] takes a resolved [`TaskConfig`] and runs it. The
//! [`LifecycleDriver`] executes the stages in order:
//!
//! 1. **Load**: batched inserts into a fresh collection, then optimize
//! 2. **Serial search**: every query once, on one connection
//! 3. **Concurrent search**: for each level, that many workers, each with
//!    its own adapter and connection, querying until the level's time is up
//!
//! Stages the backend cannot run are skipped by capability query and
//! recorded in the summary. Transient per-call failures are counted and
//! the stage continues; configuration, capability and lifecycle errors end
//! the run.

use parking_lot::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use vdbbench_clients::{
    ClientError, ClientOptions, ClientResult, Connection, Filter, Operation, TaskConfig,
};
use vdbbench_core::{CommonParams, IndexType};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::summary::{
    record_error, ConcurrentStats, Latencies, LoadStats, RunSummary, SearchStats, Stage,
};

/// Executes a resolved task.
pub trait Driver: Send + Sync {
    /// Run every stage the task asks for.
    fn run(&self, task: &TaskConfig) -> Result<RunSummary>;
}

/// The built-in load / search / concurrent-search driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleDriver;

impl LifecycleDriver {
    /// Create a driver
    pub fn new() -> Self {
        Self
    }
}

/// Query filter of the selected case.
///
/// Ids are dense from zero, so excluding the first `rate` of them leaves
/// the requested fraction of the data searchable.
pub fn case_filter(common: &CommonParams) -> Option<Filter> {
    common
        .case_type
        .filter_rate()
        .map(|rate| Filter::IdAtLeast((common.dataset_size() as f64 * rate).round() as i64))
}

/// Whether the run drops the existing collection.
///
/// Only a load into a backend that can insert replaces the collection.
pub fn drops_old(task: &TaskConfig) -> bool {
    let common = &task.common;
    common.drop_old && common.load && task.capabilities().insert
}

/// Split a call result into value, recorded transient failure, or fatal error.
fn transient<T>(result: ClientResult<T>) -> Result<std::result::Result<T, ClientError>> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(e) if e.is_transient() => Ok(Err(e)),
        Err(e) => Err(e.into()),
    }
}

impl Driver for LifecycleDriver {
    fn run(&self, task: &TaskConfig) -> Result<RunSummary> {
        let common = &task.common;
        let capabilities = task.capabilities();
        let dataset = Dataset::new(
            task.dim(),
            common.dataset_size(),
            common.num_queries,
            common.seed,
        );
        let queries = dataset.queries();
        let filter = case_filter(common);
        let mut summary = RunSummary::start(task);

        info!(
            "Run {} on {} ({}, {}): {} vectors, {} queries",
            task.run_id,
            task.db_label,
            task.index_type,
            common.case_type,
            dataset.size(),
            queries.len()
        );

        let mut options = task.client_options();
        options.drop_old = drops_old(task);
        let mut db = task.new_client(&options)?;
        {
            let mut conn = db.connect()?;

            if common.load {
                if capabilities.insert {
                    let mut stats = load(conn.as_mut(), &dataset, common.batch_size)?;
                    // NONE has no index to build
                    if task.index_type != IndexType::None && !capabilities.optimize {
                        summary.skip(Stage::Optimize, Operation::Optimize);
                    } else if task.index_type != IndexType::None {
                        let started = Instant::now();
                        match transient(conn.optimize(Some(dataset.size())))? {
                            Ok(()) => stats.optimize_secs = Some(started.elapsed().as_secs_f64()),
                            Err(e) => {
                                warn!("Optimize failed: {}", e);
                                record_error(&mut stats.errors, e);
                            }
                        }
                    }
                    summary.load = Some(stats);
                } else {
                    summary.skip(Stage::Load, Operation::Insert);
                }
            }

            if common.search_serial {
                summary.serial_search =
                    Some(serial_search(conn.as_mut(), &queries, common.k, filter.as_ref())?);
            }

            conn.close()?;
        }
        drop(db);

        if common.search_concurrent {
            // The collection exists by now; workers never create or drop it
            options.drop_old = false;
            options.load = false;
            for &level in &common.num_concurrency {
                let stats = concurrent_search(
                    task,
                    &options,
                    &queries,
                    filter.as_ref(),
                    level,
                    common.concurrency_duration(),
                )?;
                info!(
                    "Concurrency {}: {} queries, {:.1} qps, p99 {:.2} ms",
                    level, stats.queries, stats.qps, stats.p99_latency_ms
                );
                summary.concurrent_search.push(stats);
            }
        }

        Ok(summary.finish())
    }
}

fn load(conn: &mut dyn Connection, dataset: &Dataset, batch_size: usize) -> Result<LoadStats> {
    let mut stats = LoadStats::default();
    let started = Instant::now();

    for batch in dataset.batches(batch_size) {
        let outcome = conn.insert_embeddings(&batch.embeddings, &batch.ids)?;
        stats.inserted += outcome.inserted;
        if let Some(e) = outcome.error {
            if !e.is_transient() {
                return Err(e.into());
            }
            stats.failed += batch.ids.len().saturating_sub(outcome.inserted);
            warn!(
                "Inserted {} of {} vectors in batch starting at {}: {}",
                outcome.inserted,
                batch.ids.len(),
                batch.ids.first().copied().unwrap_or_default(),
                e
            );
            record_error(&mut stats.errors, e);
        }
    }

    stats.insert_secs = started.elapsed().as_secs_f64();
    info!(
        "Loaded {} vectors ({} failed) in {:.2}s",
        stats.inserted, stats.failed, stats.insert_secs
    );
    Ok(stats)
}

fn serial_search(
    conn: &mut dyn Connection,
    queries: &[Vec<f32>],
    k: usize,
    filter: Option<&Filter>,
) -> Result<SearchStats> {
    let mut stats = SearchStats::default();
    let mut latencies = Vec::with_capacity(queries.len());

    for query in queries {
        let started = Instant::now();
        match transient(conn.search_embedding(query, k, filter))? {
            Ok(_) => {
                latencies.push(started.elapsed());
                stats.queries += 1;
            }
            Err(e) => {
                stats.failed += 1;
                record_error(&mut stats.errors, e);
            }
        }
    }

    let digest = Latencies::of(&mut latencies);
    stats.mean_latency_ms = digest.mean_ms;
    stats.p99_latency_ms = digest.p99_ms;
    info!(
        "Serial search: {} queries ({} failed), mean {:.2} ms, p99 {:.2} ms",
        stats.queries, stats.failed, stats.mean_latency_ms, stats.p99_latency_ms
    );
    Ok(stats)
}

#[derive(Default)]
struct Tally {
    latencies: Vec<Duration>,
    failed: usize,
    errors: Vec<String>,
}

fn concurrent_search(
    task: &TaskConfig,
    options: &ClientOptions,
    queries: &[Vec<f32>],
    filter: Option<&Filter>,
    level: usize,
    duration: Duration,
) -> Result<ConcurrentStats> {
    let tally = Mutex::new(Tally::default());
    let started = Instant::now();
    let deadline = started + duration;

    let results: Vec<Result<()>> = thread::scope(|scope| {
        let workers: Vec<_> = (0..level)
            .map(|worker| {
                let tally = &tally;
                scope.spawn(move || -> Result<()> {
                    // Each worker owns its adapter and connection
                    let mut db = task.new_client(options)?;
                    let mut conn = db.connect()?;
                    let mut local = Tally::default();
                    let mut next = worker;

                    while !queries.is_empty() && Instant::now() < deadline {
                        let query = &queries[next % queries.len()];
                        next += level;
                        let sent = Instant::now();
                        match transient(conn.search_embedding(query, task.common.k, filter))? {
                            Ok(_) => local.latencies.push(sent.elapsed()),
                            Err(e) => {
                                local.failed += 1;
                                record_error(&mut local.errors, e);
                            }
                        }
                    }
                    conn.close()?;

                    let mut shared = tally.lock();
                    shared.latencies.append(&mut local.latencies);
                    shared.failed += local.failed;
                    for e in local.errors {
                        record_error(&mut shared.errors, e);
                    }
                    Ok(())
                })
            })
            .collect();

        workers
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(Error::Worker("search worker panicked".into())))
            })
            .collect()
    });
    results.into_iter().collect::<Result<Vec<()>>>()?;

    let elapsed = started.elapsed().as_secs_f64();
    let mut tally = tally.into_inner();
    let queries_done = tally.latencies.len();
    let digest = Latencies::of(&mut tally.latencies);
    Ok(ConcurrentStats {
        concurrency: level,
        queries: queries_done,
        failed: tally.failed,
        qps: if elapsed > 0.0 {
            queries_done as f64 / elapsed
        } else {
            0.0
        },
        p99_latency_ms: digest.p99_ms,
        errors: tally.errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdbbench_core::{CaseType, FromParams, ParamSet, RawParams};

    fn common(case: &str, num_vectors: &str) -> CommonParams {
        let raw: RawParams = [("case_type", case), ("num_vectors", num_vectors)]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let bag = ParamSet::compose(&CommonParams::groups())
            .unwrap()
            .resolve(&raw)
            .unwrap();
        CommonParams::from_params(&bag).unwrap()
    }

    #[test]
    fn test_case_filter() {
        assert_eq!(case_filter(&common("Performance768D1M", "0")), None);
        assert_eq!(
            case_filter(&common("Performance768D1M1P", "0")),
            Some(Filter::IdAtLeast(10_000))
        );
        assert_eq!(
            case_filter(&common("Performance1536D500K99P", "1000")),
            Some(Filter::IdAtLeast(990))
        );
        assert_eq!(
            common("Performance1536D500K99P", "0").case_type,
            CaseType::Performance1536D500K99P
        );
    }
}
