//! Index configuration model
//!
//! An index config is tagged by an [`IndexType`] and carries two disjoint
//! parameter groups:
//!
//! - **build-time** parameters, rendered by [`DbCaseConfig::index_param`]
//!   and used only when creating or optimizing an index
//! - **search-time** parameters, rendered by [`DbCaseConfig::search_param`]
//!   and used only when issuing a query
//!
//! ## Sentinel values
//!
//! A numeric parameter of `0` means "use the backend default". Rendering
//! omits it from the request entirely; any other value is forwarded verbatim.
//!
//! ## Search parameter dispatch
//!
//! Exactly one search parameter name applies to each index type. A search
//! request carrying any other name is a [`ConfigError::MismatchedSearchParam`];
//! a request missing it is a [`ConfigError::MissingSearchParam`].

pub mod hnsw;
pub mod ivfpq;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::ConfigError;

/// Search-request parameters, keyed by wire name.
pub type SearchParams = Map<String, Value>;

/// Index algorithm a run targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexType {
    /// No index: brute-force scans
    #[serde(rename = "NONE")]
    None,
    /// Let the backend choose
    #[serde(rename = "AUTOINDEX")]
    AutoIndex,
    /// Inverted file with product quantization (partition family)
    #[serde(rename = "IVF_PQ")]
    IvfPq,
    /// Hierarchical navigable small world graph (graph family)
    #[serde(rename = "HNSW")]
    Hnsw,
}

impl IndexType {
    /// Wire name
    pub fn name(&self) -> &'static str {
        match self {
            IndexType::None => "NONE",
            IndexType::AutoIndex => "AUTOINDEX",
            IndexType::IvfPq => "IVF_PQ",
            IndexType::Hnsw => "HNSW",
        }
    }

    /// Parse from a wire name (case-insensitive, `IVFPQ` accepted)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NONE" => Some(IndexType::None),
            "AUTOINDEX" => Some(IndexType::AutoIndex),
            "IVF_PQ" | "IVFPQ" => Some(IndexType::IvfPq),
            "HNSW" => Some(IndexType::Hnsw),
            _ => None,
        }
    }

    /// The generic search parameter for this index type.
    ///
    /// Probe count for the partition family, search breadth for the graph
    /// family, nothing for index types without a tunable search.
    pub fn search_param_name(&self) -> Option<&'static str> {
        match self {
            IndexType::IvfPq => Some(ivfpq::NPROBES),
            IndexType::Hnsw => Some(hnsw::EF),
            IndexType::None | IndexType::AutoIndex => None,
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Similarity metric of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MetricType {
    /// Euclidean distance
    #[default]
    L2,
    /// Cosine similarity
    #[serde(rename = "COSINE")]
    Cosine,
    /// Inner product
    #[serde(rename = "IP")]
    Ip,
}

impl MetricType {
    /// Wire name
    pub fn name(&self) -> &'static str {
        match self {
            MetricType::L2 => "L2",
            MetricType::Cosine => "COSINE",
            MetricType::Ip => "IP",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-backend index configuration.
///
/// Implementations are tagged unions with one variant per supported
/// [`IndexType`], each variant carrying only its own fields. Configs are
/// immutable once built; adapters receive their own clone.
pub trait DbCaseConfig: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    /// Index type this config targets
    fn index_type(&self) -> IndexType;

    /// Build-request shape, or `None` when no index is built.
    fn index_param(&self, metric: MetricType) -> Option<Value>;

    /// Search-request parameters. Sentinel values are absent.
    fn search_param(&self) -> SearchParams;

    /// Wire name of the one search parameter this config accepts.
    fn search_param_key(&self) -> Option<&'static str> {
        self.index_type().search_param_name()
    }
}

/// Reject search parameters that belong to another index type.
pub fn validate_search_params(
    index: IndexType,
    key: Option<&str>,
    params: &SearchParams,
) -> Result<(), ConfigError> {
    match params.keys().find(|name| Some(name.as_str()) != key) {
        Some(foreign) => Err(ConfigError::MismatchedSearchParam {
            index,
            param: foreign.clone(),
        }),
        None => Ok(()),
    }
}

/// The applicable search parameter and its value, or
/// [`ConfigError::MissingSearchParam`] when it is absent.
pub fn required_search_param<'a>(
    index: IndexType,
    key: Option<&'static str>,
    params: &'a SearchParams,
) -> Result<(&'static str, &'a Value), ConfigError> {
    validate_search_params(index, key, params)?;
    key.and_then(|name| params.get(name).map(|value| (name, value)))
        .ok_or(ConfigError::MissingSearchParam { index })
}

/// `Some(value)` unless `value` is the "use backend default" sentinel.
pub(crate) fn non_sentinel(value: u32) -> Option<u32> {
    (value != 0).then_some(value)
}

/// Serialize a flat parameter struct into a wire map.
pub(crate) fn to_map<T: Serialize>(params: &T) -> Map<String, Value> {
    match serde_json::to_value(params) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Parse a wire map back into a flat parameter struct.
pub(crate) fn from_map<T: serde::de::DeserializeOwned>(
    what: &str,
    map: &Map<String, Value>,
) -> Result<T, ConfigError> {
    serde_json::from_value(Value::Object(map.clone()))
        .map_err(|e| ConfigError::invalid(what, Value::Object(map.clone()), e.to_string()))
}
