//! Qdrant over its REST API.
//!
//! Supports the full lifecycle. The collection is (re)created when the
//! client is constructed, with indexing deferred until [`optimize`].
//!
//! [`optimize`]: crate::Connection::optimize

mod cli;
mod client;
mod config;

pub use cli::{commands, QdrantLocalInput, QDRANT_LOCAL_PARAMS};
pub use client::{
    collection_body, collection_status, parse_search_response, search_body, upsert_body,
    QdrantLocalClient,
};
pub use config::{distance, QdrantLocalConfig, QdrantLocalIndexConfig, HNSW_EF};

use vdbbench_core::{ConfigError, Db};

use crate::api::{Capabilities, VectorDb};
use crate::backend::{check_search_params, Backend, ClientOptions};
use crate::error::ClientResult;

/// The Qdrant backend.
pub struct QdrantLocal;

impl Backend for QdrantLocal {
    const DB: Db = Db::QdrantLocal;
    type Config = QdrantLocalConfig;
    type CaseConfig = QdrantLocalIndexConfig;

    fn capabilities(_case_config: &QdrantLocalIndexConfig) -> Capabilities {
        Capabilities::ALL
    }

    fn validate(case_config: &QdrantLocalIndexConfig, searching: bool) -> Result<(), ConfigError> {
        // Without a graph every search is exact and takes no breadth
        check_search_params(case_config, searching && case_config.has_graph())
    }

    fn new_client(
        dim: usize,
        config: QdrantLocalConfig,
        case_config: QdrantLocalIndexConfig,
        options: &ClientOptions,
    ) -> ClientResult<Box<dyn VectorDb>> {
        let client = QdrantLocalClient::new(dim, config, case_config, options)?;
        Ok(Box::new(client))
    }
}
