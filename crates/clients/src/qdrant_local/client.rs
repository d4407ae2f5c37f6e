//! Qdrant REST adapter.

use serde_json::{json, Value};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use vdbbench_core::{required_search_param, Db, DbCaseConfig, MetricType, SearchParams};

use super::config::{QdrantLocalConfig, QdrantLocalIndexConfig};
use crate::api::{Capabilities, Connection, Filter, InsertOutcome, VectorDb};
use crate::backend::ClientOptions;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;

/// Indexing threshold (KB) restored by optimize.
const INDEXING_THRESHOLD: u64 = 20_000;
const POLL_INTERVAL: Duration = Duration::from_millis(500);
const LABEL: &str = "qdrant";

// =========================================================================
// Request and response shapes
// =========================================================================

/// Collection creation body. Indexing stays off until optimize.
pub fn collection_body(
    dim: usize,
    metric: MetricType,
    case_config: &QdrantLocalIndexConfig,
) -> Value {
    let index = case_config.index_param(metric).unwrap_or(Value::Null);
    json!({
        "vectors": {
            "size": dim,
            "distance": index["distance"],
            "on_disk": index["on_disk"],
        },
        "hnsw_config": index["hnsw_config"],
        "optimizers_config": { "indexing_threshold": 0 },
    })
}

/// Upsert body with the id duplicated into the payload for filtering.
///
/// Qdrant point ids are unsigned, so a negative id is rejected here.
pub fn upsert_body(embeddings: &[Vec<f32>], ids: &[i64]) -> Result<Value, String> {
    if embeddings.len() != ids.len() {
        return Err(format!(
            "{} embeddings but {} ids",
            embeddings.len(),
            ids.len()
        ));
    }
    let points = embeddings
        .iter()
        .zip(ids)
        .map(|(vector, &id)| {
            if id < 0 {
                return Err(format!("negative point id {}", id));
            }
            Ok(json!({ "id": id, "vector": vector, "payload": { "id": id } }))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!({ "points": points }))
}

/// Search body. `search_config` is forwarded under `params`.
pub fn search_body(
    query: &[f32],
    k: usize,
    search_config: &SearchParams,
    filter: Option<&Filter>,
) -> Value {
    let mut body = json!({ "vector": query, "limit": k });
    if !search_config.is_empty() {
        body["params"] = Value::Object(search_config.clone());
    }
    if let Some(Filter::IdAtLeast(bound)) = filter {
        body["filter"] = json!({ "must": [{ "key": "id", "range": { "gte": bound } }] });
    }
    body
}

/// Ids out of a search response.
pub fn parse_search_response(response: &Value) -> Result<Vec<i64>, String> {
    let hits = response["result"]
        .as_array()
        .ok_or_else(|| "response without a result array".to_string())?;
    hits.iter()
        .map(|hit| {
            hit.get("id")
                .and_then(Value::as_i64)
                .ok_or_else(|| format!("hit without an integer id: {}", hit))
        })
        .collect()
}

/// Optimizer status out of a collection info response.
pub fn collection_status(response: &Value) -> Option<&str> {
    response["result"]["status"].as_str()
}

// =========================================================================
// Adapter
// =========================================================================

/// Unconnected Qdrant adapter.
#[derive(Debug)]
pub struct QdrantLocalClient {
    dim: usize,
    config: QdrantLocalConfig,
    case_config: QdrantLocalIndexConfig,
    collection_name: String,
    search_config: SearchParams,
    request_timeout: Duration,
    optimize_timeout: Duration,
}

impl QdrantLocalClient {
    /// Build the adapter and make sure its collection exists.
    ///
    /// With `drop_old` an existing collection is deleted first. A missing
    /// collection is created only when the run loads; any other failure
    /// to read it is a lifecycle error.
    pub fn new(
        dim: usize,
        config: QdrantLocalConfig,
        case_config: QdrantLocalIndexConfig,
        options: &ClientOptions,
    ) -> ClientResult<Self> {
        let client = Self {
            dim,
            config,
            case_config,
            collection_name: options.collection_name.clone(),
            search_config: case_config.search_param(),
            request_timeout: options.request_timeout,
            optimize_timeout: options.optimize_timeout,
        };

        let http = client.http();
        let path = client.collection_path();
        let prepare = || -> Result<(), String> {
            if options.drop_old {
                info!("Dropping Qdrant collection {}", client.collection_name);
                http.call("DELETE", &path).map_err(|e| e.to_string())?;
            }
            match http.call("GET", &path) {
                Ok(_) => Ok(()),
                Err(ClientError::Status { status: 404, .. }) if options.load => {
                    info!(
                        "Creating Qdrant collection {} (dim {}, {})",
                        client.collection_name,
                        dim,
                        options.metric
                    );
                    let body = collection_body(dim, options.metric, &client.case_config);
                    http.send_json("PUT", &path, &body)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                }
                Err(ClientError::Status { status: 404, .. }) => {
                    Err("collection does not exist and the run does not load".to_string())
                }
                Err(e) => Err(e.to_string()),
            }
        };
        prepare().map_err(|reason| {
            ClientError::Lifecycle(format!(
                "failed to prepare collection {}: {}",
                client.collection_name, reason
            ))
        })?;

        Ok(client)
    }

    fn http(&self) -> HttpClient {
        HttpClient::new(self.config.url.clone(), LABEL, self.request_timeout, None)
    }

    fn collection_path(&self) -> String {
        format!("/collections/{}", self.collection_name)
    }

    /// Vector dimensionality
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl VectorDb for QdrantLocalClient {
    fn db(&self) -> Db {
        Db::QdrantLocal
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn connect(&mut self) -> ClientResult<Box<dyn Connection + '_>> {
        let http = self.http();
        let path = self.collection_path();
        http.call("GET", &path).map_err(|e| {
            ClientError::Lifecycle(format!(
                "collection {} is not reachable: {}",
                self.collection_name, e
            ))
        })?;
        debug!("Connected to Qdrant collection {}", self.collection_name);
        Ok(Box::new(QdrantLocalConnection {
            client: self,
            http,
            path,
        }))
    }
}

struct QdrantLocalConnection<'a> {
    client: &'a QdrantLocalClient,
    http: HttpClient,
    path: String,
}

impl QdrantLocalConnection<'_> {
    fn wait_for_green(&self) -> ClientResult<()> {
        let deadline = Instant::now() + self.client.optimize_timeout;
        loop {
            let info = self.http.call("GET", &self.path)?;
            match collection_status(&info) {
                Some("green") => return Ok(()),
                Some("red") => {
                    return Err(ClientError::Backend(format!(
                        "collection {} reported status red",
                        self.client.collection_name
                    )))
                }
                status => debug!("Collection status {:?}, waiting", status),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(ClientError::Timeout {
                    operation: format!("indexing collection {}", self.client.collection_name),
                    after: self.client.optimize_timeout,
                });
            }
            thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }
}

impl Connection for QdrantLocalConnection<'_> {
    fn insert_embeddings(
        &mut self,
        embeddings: &[Vec<f32>],
        ids: &[i64],
    ) -> ClientResult<InsertOutcome> {
        let body = match upsert_body(embeddings, ids) {
            Ok(body) => body,
            Err(reason) => return Ok(InsertOutcome::partial(0, ClientError::Backend(reason))),
        };
        let path = format!("{}/points?wait=true", self.path);
        match self.http.send_json("PUT", &path, &body) {
            Ok(_) => Ok(InsertOutcome::complete(ids.len())),
            Err(e) => {
                warn!(
                    "Failed to insert {} points into {}: {}",
                    ids.len(),
                    self.client.collection_name,
                    e
                );
                Ok(InsertOutcome::partial(0, e))
            }
        }
    }

    fn search_embedding(
        &mut self,
        query: &[f32],
        k: usize,
        filter: Option<&Filter>,
    ) -> ClientResult<Vec<i64>> {
        let config = &self.client.case_config;
        if config.has_graph() {
            required_search_param(
                config.index_type(),
                config.search_param_key(),
                &self.client.search_config,
            )?;
        }
        let body = search_body(query, k, &self.client.search_config, filter);
        let path = format!("{}/points/search", self.path);
        let response = self.http.send_json("POST", &path, &body)?;
        parse_search_response(&response).map_err(|message| ClientError::Decode {
            url: format!("{}{}", LABEL, path),
            message,
        })
    }

    fn optimize(&mut self, data_size: Option<usize>) -> ClientResult<()> {
        info!(
            "Optimizing Qdrant collection {} ({} vectors)",
            self.client.collection_name,
            data_size.map_or_else(|| "unknown".to_string(), |n| n.to_string())
        );
        let body = json!({ "optimizers_config": { "indexing_threshold": INDEXING_THRESHOLD } });
        self.http.send_json("PATCH", &self.path, &body)?;
        self.wait_for_green()
    }

    fn close(self: Box<Self>) -> ClientResult<()> {
        Ok(())
    }
}

impl Drop for QdrantLocalConnection<'_> {
    fn drop(&mut self) {
        debug!("Released Qdrant connection to {}", self.client.collection_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdbbench_core::Secret;

    fn index() -> QdrantLocalIndexConfig {
        QdrantLocalIndexConfig {
            on_disk: true,
            m: 16,
            ef_construct: 200,
            hnsw_ef: 0,
        }
    }

    #[test]
    fn test_collection_body_defers_indexing() {
        let body = collection_body(768, MetricType::Cosine, &index());
        assert_eq!(body["vectors"]["size"], json!(768));
        assert_eq!(body["vectors"]["distance"], json!("Cosine"));
        assert_eq!(body["vectors"]["on_disk"], json!(true));
        assert_eq!(body["hnsw_config"]["m"], json!(16));
        assert_eq!(body["hnsw_config"]["ef_construct"], json!(200));
        assert_eq!(body["optimizers_config"]["indexing_threshold"], json!(0));
    }

    #[test]
    fn test_upsert_body() {
        let body = upsert_body(&[vec![0.5, 0.25], vec![1.0, 0.0]], &[7, 8]).unwrap();
        assert_eq!(
            body["points"][1],
            json!({"id": 8, "vector": [1.0, 0.0], "payload": {"id": 8}})
        );
        assert!(upsert_body(&[vec![0.5]], &[-1]).is_err());
        assert!(upsert_body(&[vec![0.5]], &[1, 2]).is_err());
    }

    #[test]
    fn test_search_body_with_filter() {
        let params = index().search_param();
        let body = search_body(&[0.1, 0.2], 10, &params, Some(&Filter::IdAtLeast(500)));
        assert_eq!(body["limit"], json!(10));
        assert_eq!(body["params"], json!({"hnsw_ef": 200}));
        assert_eq!(
            body["filter"]["must"][0],
            json!({"key": "id", "range": {"gte": 500}})
        );

        let body = search_body(&[0.1], 1, &SearchParams::new(), None);
        assert!(body.get("params").is_none());
        assert!(body.get("filter").is_none());
    }

    #[test]
    fn test_parse_responses() {
        let response = json!({"result": [{"id": 4, "score": 0.9}, {"id": 2, "score": 0.8}]});
        assert_eq!(parse_search_response(&response).unwrap(), vec![4, 2]);
        assert!(parse_search_response(&json!({"status": "ok"})).is_err());

        let info = json!({"result": {"status": "yellow"}});
        assert_eq!(collection_status(&info), Some("yellow"));
        assert_eq!(collection_status(&json!({})), None);
    }

    #[test]
    fn test_unreachable_instance_is_lifecycle_error() {
        let config = QdrantLocalConfig {
            url: Secret::new("http://127.0.0.1:1"),
            grpc_port: 3334,
        };
        let options = ClientOptions {
            request_timeout: Duration::from_millis(200),
            ..ClientOptions::default()
        };
        let err = QdrantLocalClient::new(8, config, index(), &options).unwrap_err();
        assert!(err.is_lifecycle());
        assert!(!err.to_string().contains("127.0.0.1"));
    }
}
