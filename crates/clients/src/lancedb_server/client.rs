//! LanceDB server adapter.

use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use vdbbench_core::{
    required_search_param, validate_search_params, ConfigError, Db, DbCaseConfig, SearchParams,
    Secret,
};

use super::config::{LanceDbServerConfig, LanceDbServerIndexConfig};
use crate::api::{Capabilities, Connection, Filter, InsertOutcome, Operation, VectorDb};
use crate::backend::ClientOptions;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;

const SEARCH_PATH: &str = "/search";

/// Search request body.
///
/// The one search parameter applicable to the index type is required; the
/// endpoint is never queried with its own defaults.
pub fn search_body(
    case_config: &LanceDbServerIndexConfig,
    search_config: &SearchParams,
    query: &[f32],
    k: usize,
) -> Result<Value, ConfigError> {
    if k == 0 {
        return Err(ConfigError::invalid("--k", 0, "must be positive"));
    }
    let (name, value) = required_search_param(
        case_config.index_type(),
        case_config.search_param_key(),
        search_config,
    )?;
    let mut body = json!({ "query": query, "k": k });
    body[name] = value.clone();
    Ok(body)
}

/// Ids out of a search response: an array of objects with an integer `id`.
pub fn parse_search_response(response: &Value) -> Result<Vec<i64>, String> {
    let rows = response
        .as_array()
        .ok_or_else(|| "expected an array of results".to_string())?;
    rows.iter()
        .map(|row| {
            row.get("id")
                .and_then(Value::as_i64)
                .ok_or_else(|| format!("result without an integer id: {}", row))
        })
        .collect()
}

/// Unconnected LanceDB server adapter.
#[derive(Debug)]
pub struct LanceDbServerClient {
    dim: usize,
    config: LanceDbServerConfig,
    case_config: LanceDbServerIndexConfig,
    table_name: String,
    search_config: SearchParams,
    request_timeout: Duration,
}

impl LanceDbServerClient {
    /// Build the adapter. Fails on `drop_old`, which the endpoint cannot do.
    pub fn new(
        dim: usize,
        config: LanceDbServerConfig,
        case_config: LanceDbServerIndexConfig,
        options: &ClientOptions,
    ) -> ClientResult<Self> {
        if options.drop_old {
            return Err(ClientError::unsupported(Db::LanceDbServer, Operation::DropOld));
        }

        // Rendered once instead of on every query
        let search_config = case_config.search_param();
        validate_search_params(
            case_config.index_type(),
            case_config.search_param_key(),
            &search_config,
        )?;
        let rendered = Value::Object(search_config.clone());
        info!(
            "LanceDBServer table {} search config: {}",
            options.collection_name, rendered
        );

        Ok(Self {
            dim,
            config,
            case_config,
            table_name: options.collection_name.clone(),
            search_config,
            request_timeout: options.request_timeout,
        })
    }

    /// Vector dimensionality
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Table queried through the endpoint
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl VectorDb for LanceDbServerClient {
    fn db(&self) -> Db {
        Db::LanceDbServer
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SEARCH_ONLY
    }

    fn connect(&mut self) -> ClientResult<Box<dyn Connection + '_>> {
        let http = HttpClient::new(
            Secret::new(self.config.uri.clone()),
            self.config.uri.clone(),
            self.request_timeout,
            self.config.token.clone(),
        );
        debug!("Connected to LanceDBServer at {}", self.config.uri);
        Ok(Box::new(LanceDbServerConnection { client: self, http }))
    }
}

struct LanceDbServerConnection<'a> {
    client: &'a LanceDbServerClient,
    http: HttpClient,
}

impl Connection for LanceDbServerConnection<'_> {
    fn insert_embeddings(
        &mut self,
        _embeddings: &[Vec<f32>],
        _ids: &[i64],
    ) -> ClientResult<InsertOutcome> {
        Err(ClientError::unsupported(Db::LanceDbServer, Operation::Insert))
    }

    fn search_embedding(
        &mut self,
        query: &[f32],
        k: usize,
        filter: Option<&Filter>,
    ) -> ClientResult<Vec<i64>> {
        if filter.is_some() {
            return Err(ClientError::unsupported(
                Db::LanceDbServer,
                Operation::FilteredSearch,
            ));
        }
        let body = search_body(&self.client.case_config, &self.client.search_config, query, k)?;
        let response = self.http.send_json("POST", SEARCH_PATH, &body)?;
        parse_search_response(&response).map_err(|message| ClientError::Decode {
            url: format!("{}{}", self.client.config.uri, SEARCH_PATH),
            message,
        })
    }

    fn optimize(&mut self, _data_size: Option<usize>) -> ClientResult<()> {
        Err(ClientError::unsupported(Db::LanceDbServer, Operation::Optimize))
    }

    fn close(self: Box<Self>) -> ClientResult<()> {
        Ok(())
    }
}

impl Drop for LanceDbServerConnection<'_> {
    fn drop(&mut self) {
        debug!("Released LanceDBServer connection to {}", self.client.config.uri);
    }
}
