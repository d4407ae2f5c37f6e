//! Backend registration and per-run client construction.
//!
//! A [`Backend`] ties a [`Db`] identity to its connection config, its index
//! config and its adapter constructor. The dispatcher never names a concrete
//! backend: it holds a type-erased [`ClientFactory`] that clones both configs
//! into every adapter it creates, so no two adapters share config state.

use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use vdbbench_core::{
    required_search_param, validate_search_params, ConfigError, Db, DbCaseConfig, IndexType,
    MetricType,
};

use crate::api::{Capabilities, VectorDb};
use crate::error::ClientResult;

/// Connection settings of one backend.
///
/// Immutable once built. Secret fields use [`vdbbench_core::Secret`] so the
/// serialized form can be logged and reported as-is.
pub trait DbConfig: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    /// Label for reports, empty when the config carries none
    fn db_label(&self) -> &str {
        ""
    }
}

/// Run-scoped settings an adapter needs besides its two configs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Collection or table name
    pub collection_name: String,
    /// Drop an existing collection while constructing the client
    pub drop_old: bool,
    /// The run loads data, so a missing collection may be created
    pub load: bool,
    /// Metric of the dataset
    pub metric: MetricType,
    /// Bound on every single request
    pub request_timeout: Duration,
    /// Bound on waiting for an index build
    pub optimize_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            collection_name: "vector_bench_test".to_string(),
            drop_old: false,
            load: true,
            metric: MetricType::default(),
            request_timeout: Duration::from_secs(30),
            optimize_timeout: Duration::from_secs(1800),
        }
    }
}

/// A supported vector database.
pub trait Backend: 'static {
    /// Identity
    const DB: Db;

    /// Connection config
    type Config: DbConfig;

    /// Index config
    type CaseConfig: DbCaseConfig;

    /// Operations the adapter supports for this index config
    fn capabilities(case_config: &Self::CaseConfig) -> Capabilities;

    /// Reject an index config the adapter could not run, before any network call.
    ///
    /// Foreign search parameters are always rejected. When the run will
    /// search, the parameter applicable to the index type must be present.
    fn validate(case_config: &Self::CaseConfig, searching: bool) -> Result<(), ConfigError> {
        check_search_params(case_config, searching)
    }

    /// Build an unconnected adapter that owns its configs.
    fn new_client(
        dim: usize,
        config: Self::Config,
        case_config: Self::CaseConfig,
        options: &ClientOptions,
    ) -> ClientResult<Box<dyn VectorDb>>;
}

/// Reject foreign search parameters, and require the applicable one when
/// `searching`.
pub fn check_search_params<C: DbCaseConfig>(
    case_config: &C,
    searching: bool,
) -> Result<(), ConfigError> {
    let params = case_config.search_param();
    let index = case_config.index_type();
    let key = case_config.search_param_key();
    if searching {
        required_search_param(index, key, &params).map(|_| ())
    } else {
        validate_search_params(index, key, &params)
    }
}

/// Type-erased constructor of adapters for one resolved command.
pub trait ClientFactory: Send + Sync {
    /// Identity
    fn db(&self) -> Db;

    /// Supported operations
    fn capabilities(&self) -> Capabilities;

    /// Index type the configs target
    fn index_type(&self) -> IndexType;

    /// See [`Backend::validate`]
    fn validate(&self, searching: bool) -> Result<(), ConfigError>;

    /// A fresh adapter with its own copies of the configs
    fn new_client(&self, dim: usize, options: &ClientOptions) -> ClientResult<Box<dyn VectorDb>>;
}

/// [`ClientFactory`] over a concrete [`Backend`].
pub struct BackendFactory<B: Backend> {
    config: B::Config,
    case_config: B::CaseConfig,
    _backend: PhantomData<fn() -> B>,
}

impl<B: Backend> BackendFactory<B> {
    /// Hold the configs of one resolved command.
    pub fn new(config: B::Config, case_config: B::CaseConfig) -> Self {
        Self {
            config,
            case_config,
            _backend: PhantomData,
        }
    }

    /// Connection config
    pub fn config(&self) -> &B::Config {
        &self.config
    }

    /// Index config
    pub fn case_config(&self) -> &B::CaseConfig {
        &self.case_config
    }
}

impl<B: Backend> ClientFactory for BackendFactory<B> {
    fn db(&self) -> Db {
        B::DB
    }

    fn capabilities(&self) -> Capabilities {
        B::capabilities(&self.case_config)
    }

    fn index_type(&self) -> IndexType {
        self.case_config.index_type()
    }

    fn validate(&self, searching: bool) -> Result<(), ConfigError> {
        B::validate(&self.case_config, searching)
    }

    fn new_client(&self, dim: usize, options: &ClientOptions) -> ClientResult<Box<dyn VectorDb>> {
        B::new_client(
            dim,
            self.config.clone(),
            self.case_config.clone(),
            options,
        )
    }
}
