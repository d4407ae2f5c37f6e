//! LanceDB behind a remote search endpoint.
//!
//! Search-only: the endpoint serves queries against a table that was built
//! elsewhere. Insert, optimize, filtered search and dropping the table all
//! report [`ClientError::Unsupported`].
//!
//! [`ClientError::Unsupported`]: crate::ClientError::Unsupported

mod cli;
mod client;
mod config;

pub use cli::{
    commands, LanceDbServerHnswInput, LanceDbServerInput, LanceDbServerIvfPqInput,
    LANCEDB_HNSW_PARAMS, LANCEDB_IVFPQ_PARAMS, LANCEDB_SERVER_PARAMS,
};
pub use client::{parse_search_response, search_body, LanceDbServerClient};
pub use config::{LanceDbServerConfig, LanceDbServerIndexConfig};

use vdbbench_core::Db;

use crate::api::{Capabilities, VectorDb};
use crate::backend::{Backend, ClientOptions};
use crate::error::ClientResult;

/// The LanceDB server backend.
pub struct LanceDbServer;

impl Backend for LanceDbServer {
    const DB: Db = Db::LanceDbServer;
    type Config = LanceDbServerConfig;
    type CaseConfig = LanceDbServerIndexConfig;

    fn capabilities(_case_config: &LanceDbServerIndexConfig) -> Capabilities {
        Capabilities::SEARCH_ONLY
    }

    fn new_client(
        dim: usize,
        config: LanceDbServerConfig,
        case_config: LanceDbServerIndexConfig,
        options: &ClientOptions,
    ) -> ClientResult<Box<dyn VectorDb>> {
        let client = LanceDbServerClient::new(dim, config, case_config, options)?;
        Ok(Box::new(client))
    }
}
