//! Qdrant connection and index configs.

use serde::Serialize;
use serde_json::{json, Map, Value};

use vdbbench_core::{DbCaseConfig, IndexType, MetricType, SearchParams, Secret};

use crate::backend::DbConfig;

/// Wire name of Qdrant's search-breadth parameter.
pub const HNSW_EF: &str = "hnsw_ef";

/// Connection to a Qdrant instance.
///
/// The URL may embed credentials, so it is held as a [`Secret`].
#[derive(Debug, Clone, Serialize)]
pub struct QdrantLocalConfig {
    /// Base URL of the REST API
    pub url: Secret,
    /// gRPC port of the instance
    pub grpc_port: u16,
}

impl DbConfig for QdrantLocalConfig {}

/// Qdrant HNSW collection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QdrantLocalIndexConfig {
    /// Store vectors and the graph on disk
    pub on_disk: bool,
    /// Graph degree, 0 disables the graph
    pub m: u32,
    /// Construction breadth
    pub ef_construct: u32,
    /// Search breadth, 0 uses `ef_construct`
    pub hnsw_ef: u32,
}

impl QdrantLocalIndexConfig {
    /// Check if a graph is built at all
    pub fn has_graph(&self) -> bool {
        self.m != 0
    }
}

/// Qdrant's name for a metric.
pub fn distance(metric: MetricType) -> &'static str {
    match metric {
        MetricType::L2 => "Euclid",
        MetricType::Cosine => "Cosine",
        MetricType::Ip => "Dot",
    }
}

impl DbCaseConfig for QdrantLocalIndexConfig {
    fn index_type(&self) -> IndexType {
        IndexType::Hnsw
    }

    fn index_param(&self, metric: MetricType) -> Option<Value> {
        let mut hnsw = Map::new();
        // m = 0 is meaningful to Qdrant and is forwarded as-is
        hnsw.insert("m".into(), self.m.into());
        if self.ef_construct != 0 {
            hnsw.insert("ef_construct".into(), self.ef_construct.into());
        }
        hnsw.insert("on_disk".into(), self.on_disk.into());

        Some(json!({
            "distance": distance(metric),
            "on_disk": self.on_disk,
            "hnsw_config": hnsw,
        }))
    }

    fn search_param(&self) -> SearchParams {
        let mut params = SearchParams::new();
        let ef = match self.hnsw_ef {
            0 => self.ef_construct,
            ef => ef,
        };
        if ef != 0 {
            params.insert(HNSW_EF.into(), ef.into());
        }
        params
    }

    fn search_param_key(&self) -> Option<&'static str> {
        Some(HNSW_EF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(m: u32, ef_construct: u32, hnsw_ef: u32) -> QdrantLocalIndexConfig {
        QdrantLocalIndexConfig {
            on_disk: false,
            m,
            ef_construct,
            hnsw_ef,
        }
    }

    #[test]
    fn test_hnsw_ef_falls_back_to_ef_construct() {
        assert_eq!(
            Value::Object(config(16, 200, 0).search_param()),
            json!({"hnsw_ef": 200})
        );
        assert_eq!(
            Value::Object(config(16, 200, 64).search_param()),
            json!({"hnsw_ef": 64})
        );
        assert!(config(16, 0, 0).search_param().is_empty());
    }

    #[test]
    fn test_build_request() {
        let rendered = config(0, 0, 0).index_param(MetricType::Cosine).unwrap();
        assert_eq!(
            rendered,
            json!({
                "distance": "Cosine",
                "on_disk": false,
                "hnsw_config": {"m": 0, "on_disk": false},
            })
        );
        assert!(!config(0, 0, 0).has_graph());
    }

    #[test]
    fn test_url_redacted() {
        let config = QdrantLocalConfig {
            url: Secret::new("https://user:pw@qdrant:6333"),
            grpc_port: 3334,
        };
        let rendered = serde_json::to_value(&config).unwrap();
        assert!(!rendered.to_string().contains("pw@"));
        assert_eq!(rendered["grpc_port"], json!(3334));
    }
}
