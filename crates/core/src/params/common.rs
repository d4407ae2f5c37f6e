//! Options shared by every command.

use serde::Serialize;
use std::time::Duration;

use super::{flag, FromParams, ParamBag, ParamGroup, ParamSpec};
use crate::case::CaseType;
use crate::error::ConfigError;

/// Run-scoped options every backend command accepts.
pub const COMMON_PARAMS: ParamGroup = ParamGroup {
    name: "Common",
    params: &[
        ParamSpec::str("db_label", "Label for this database configuration in reports")
            .default_str(""),
        ParamSpec::str("case_type", "Dataset case to run").default_str("Performance768D1M"),
        ParamSpec::int("k", "Number of nearest neighbours to request per query").default_int(100),
        ParamSpec::str(
            "num_concurrency",
            "Comma-separated worker counts for the concurrent search stage",
        )
        .default_str("1,5,10"),
        ParamSpec::int(
            "concurrency_duration",
            "Seconds to run each concurrency level",
        )
        .default_int(30),
        ParamSpec::bool("drop_old", "Drop the existing collection before loading")
            .default_bool(true),
        ParamSpec::bool("load", "Load the dataset into the collection").default_bool(true),
        ParamSpec::bool("search_serial", "Run the serial search stage").default_bool(true),
        ParamSpec::bool("search_concurrent", "Run the concurrent search stage")
            .default_bool(true),
        ParamSpec::flag("dry_run", "Print the resolved configuration and exit"),
        ParamSpec::int(
            "num_vectors",
            "Vectors to load, unset = the size of the selected case",
        )
        .default_int(0),
        ParamSpec::int("num_queries", "Queries in the search set").default_int(100),
        ParamSpec::int("batch_size", "Vectors per insert call").default_int(1000),
        ParamSpec::int("seed", "Seed for the synthetic dataset").default_int(42),
        ParamSpec::str("collection_name", "Collection or table to benchmark")
            .default_str("vector_bench_test"),
        ParamSpec::int("request_timeout", "Seconds before a single request is abandoned")
            .default_int(30),
        ParamSpec::int(
            "optimize_timeout",
            "Seconds to wait for an index build to finish",
        )
        .default_int(1800),
    ],
};

/// Typed form of [`COMMON_PARAMS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonParams {
    /// Label for reports
    pub db_label: String,
    /// Dataset case
    pub case_type: CaseType,
    /// Neighbours per query
    pub k: usize,
    /// Worker counts for the concurrent stage
    pub num_concurrency: Vec<usize>,
    /// Seconds per concurrency level
    pub concurrency_duration: u64,
    /// Drop the collection before loading
    pub drop_old: bool,
    /// Run the load stage
    pub load: bool,
    /// Run the serial search stage
    pub search_serial: bool,
    /// Run the concurrent search stage
    pub search_concurrent: bool,
    /// Resolve only
    pub dry_run: bool,
    /// Vectors to load (0 = case size)
    pub num_vectors: usize,
    /// Queries in the search set
    pub num_queries: usize,
    /// Vectors per insert call
    pub batch_size: usize,
    /// Synthetic dataset seed
    pub seed: u64,
    /// Collection or table name
    pub collection_name: String,
    /// Per-request timeout, seconds
    pub request_timeout: u64,
    /// Index build wait, seconds
    pub optimize_timeout: u64,
}

impl CommonParams {
    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Index build wait
    pub fn optimize_timeout(&self) -> Duration {
        Duration::from_secs(self.optimize_timeout)
    }

    /// Time spent at each concurrency level
    pub fn concurrency_duration(&self) -> Duration {
        Duration::from_secs(self.concurrency_duration)
    }

    /// Vectors the load stage inserts
    pub fn dataset_size(&self) -> usize {
        match self.num_vectors {
            0 => self.case_type.size(),
            n => n,
        }
    }
}

impl FromParams for CommonParams {
    fn groups() -> Vec<&'static ParamGroup> {
        vec![&COMMON_PARAMS]
    }

    fn from_params(bag: &ParamBag) -> Result<Self, ConfigError> {
        let case_name = bag.str("case_type")?;
        let case_type = CaseType::parse(case_name).ok_or_else(|| {
            ConfigError::invalid(&flag("case_type"), case_name, "unknown case type")
        })?;

        Ok(Self {
            db_label: bag.str("db_label")?.to_string(),
            case_type,
            k: bag.positive("k")?,
            num_concurrency: parse_concurrency(bag.str("num_concurrency")?)?,
            concurrency_duration: bag.positive("concurrency_duration")? as u64,
            drop_old: bag.bool("drop_old")?,
            load: bag.bool("load")?,
            search_serial: bag.bool("search_serial")?,
            search_concurrent: bag.bool("search_concurrent")?,
            dry_run: bag.bool("dry_run")?,
            num_vectors: bag.usize("num_vectors")?,
            num_queries: bag.positive("num_queries")?,
            batch_size: bag.positive("batch_size")?,
            seed: bag.usize("seed")? as u64,
            collection_name: bag.str("collection_name")?.to_string(),
            request_timeout: bag.positive("request_timeout")? as u64,
            optimize_timeout: bag.positive("optimize_timeout")? as u64,
        })
    }
}

fn parse_concurrency(raw: &str) -> Result<Vec<usize>, ConfigError> {
    let option = flag("num_concurrency");
    let levels = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<usize>() {
            Ok(0) | Err(_) => Err(ConfigError::invalid(
                &option,
                raw,
                "expected comma-separated positive integers",
            )),
            Ok(n) => Ok(n),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if levels.is_empty() {
        return Err(ConfigError::invalid(&option, raw, "at least one level is required"));
    }
    Ok(levels)
}
