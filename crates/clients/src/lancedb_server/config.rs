//! LanceDB server connection and index configs.

use serde::Serialize;
use serde_json::{json, Map, Value};

use vdbbench_core::{
    DbCaseConfig, HnswConfig, IndexType, IvfPqConfig, MetricType, SearchParams, Secret,
};

use crate::backend::DbConfig;

/// Connection to a LanceDB search endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LanceDbServerConfig {
    /// Label for reports
    pub db_label: String,
    /// Base URI of the search endpoint
    pub uri: String,
    /// Sent as `x-api-key` when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<Secret>,
}

impl DbConfig for LanceDbServerConfig {
    fn db_label(&self) -> &str {
        &self.db_label
    }
}

/// LanceDB index config, one variant per index type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "index")]
pub enum LanceDbServerIndexConfig {
    /// Brute-force scans
    #[serde(rename = "NONE")]
    None,
    /// LanceDB picks the index
    #[serde(rename = "AUTOINDEX")]
    AutoIndex,
    /// IVF-PQ
    #[serde(rename = "IVF_PQ")]
    IvfPq(IvfPqConfig),
    /// IVF with HNSW sub-indexes over scalar-quantized vectors
    #[serde(rename = "HNSW")]
    Hnsw(HnswConfig),
}

fn metric_name(metric: MetricType) -> &'static str {
    match metric {
        MetricType::L2 => "l2",
        MetricType::Cosine => "cosine",
        MetricType::Ip => "dot",
    }
}

fn with_build_params(mut head: Map<String, Value>, build: Map<String, Value>) -> Value {
    head.extend(build);
    Value::Object(head)
}

impl DbCaseConfig for LanceDbServerIndexConfig {
    fn index_type(&self) -> IndexType {
        match self {
            LanceDbServerIndexConfig::None => IndexType::None,
            LanceDbServerIndexConfig::AutoIndex => IndexType::AutoIndex,
            LanceDbServerIndexConfig::IvfPq(_) => IndexType::IvfPq,
            LanceDbServerIndexConfig::Hnsw(_) => IndexType::Hnsw,
        }
    }

    fn index_param(&self, metric: MetricType) -> Option<Value> {
        let metric = metric_name(metric);
        match self {
            LanceDbServerIndexConfig::None => None,
            LanceDbServerIndexConfig::AutoIndex => Some(json!({ "metric": metric })),
            LanceDbServerIndexConfig::IvfPq(config) => {
                let mut head = Map::new();
                head.insert("index_type".into(), "IVF_PQ".into());
                head.insert("metric".into(), metric.into());
                Some(with_build_params(head, config.build_params().to_map()))
            }
            LanceDbServerIndexConfig::Hnsw(config) => {
                let mut head = Map::new();
                head.insert("index_type".into(), "IVF_HNSW_SQ".into());
                head.insert("metric".into(), metric.into());
                Some(with_build_params(head, config.build_params().to_map()))
            }
        }
    }

    fn search_param(&self) -> SearchParams {
        match self {
            LanceDbServerIndexConfig::None | LanceDbServerIndexConfig::AutoIndex => {
                SearchParams::new()
            }
            LanceDbServerIndexConfig::IvfPq(config) => config.search_params().to_map(),
            LanceDbServerIndexConfig::Hnsw(config) => config.search_params().to_map(),
        }
    }
}
