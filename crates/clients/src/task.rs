//! The shared run entry point.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use vdbbench_core::{CommonParams, ConfigError, Db, DbCaseConfig, IndexType};

use crate::api::{Capabilities, VectorDb};
use crate::backend::{Backend, BackendFactory, ClientFactory, ClientOptions, DbConfig};
use crate::error::ClientResult;

/// Everything one benchmark run needs.
///
/// Built by every command through [`TaskConfig::new`]. The serialized form
/// is safe to log and report: connection configs render their secrets
/// masked.
#[derive(Clone, Serialize)]
pub struct TaskConfig {
    /// Unique id of this run
    pub run_id: Uuid,
    /// Backend identity
    pub db: Db,
    /// Label for reports
    pub db_label: String,
    /// Index type of the run
    pub index_type: IndexType,
    /// Connection config, redacted
    pub db_config: Value,
    /// Index config
    pub db_case_config: Value,
    /// Shared run options
    pub common: CommonParams,
    #[serde(skip)]
    factory: Arc<dyn ClientFactory>,
}

impl TaskConfig {
    /// Bundle a resolved connection config, index config and common options.
    pub fn new<B: Backend>(
        config: B::Config,
        case_config: B::CaseConfig,
        common: CommonParams,
    ) -> Self {
        let db_label = [config.db_label(), common.db_label.as_str(), B::DB.name()]
            .into_iter()
            .find(|label| !label.is_empty())
            .unwrap_or_default()
            .to_string();
        let db_config = serde_json::to_value(&config).unwrap_or(Value::Null);
        let db_case_config = serde_json::to_value(&case_config).unwrap_or(Value::Null);
        let index_type = case_config.index_type();

        Self {
            run_id: Uuid::new_v4(),
            db: B::DB,
            db_label,
            index_type,
            db_config,
            db_case_config,
            common,
            factory: Arc::new(BackendFactory::<B>::new(config, case_config)),
        }
    }

    /// Supported operations of the selected backend
    pub fn capabilities(&self) -> Capabilities {
        self.factory.capabilities()
    }

    /// Check the index config against the stages this run executes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.factory
            .validate(self.common.search_serial || self.common.search_concurrent)
    }

    /// Adapter settings derived from the common options
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            collection_name: self.common.collection_name.clone(),
            drop_old: self.common.drop_old,
            load: self.common.load,
            metric: self.common.case_type.metric(),
            request_timeout: self.common.request_timeout(),
            optimize_timeout: self.common.optimize_timeout(),
        }
    }

    /// Vector dimensionality of the selected case
    pub fn dim(&self) -> usize {
        self.common.case_type.dim()
    }

    /// A fresh adapter owning its own copies of both configs.
    pub fn new_client(&self, options: &ClientOptions) -> ClientResult<Box<dyn VectorDb>> {
        self.factory.new_client(self.dim(), options)
    }
}

impl fmt::Debug for TaskConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskConfig")
            .field("run_id", &self.run_id)
            .field("db", &self.db)
            .field("db_label", &self.db_label)
            .field("index_type", &self.index_type)
            .field("db_config", &self.db_config)
            .field("db_case_config", &self.db_case_config)
            .field("common", &self.common)
            .finish_non_exhaustive()
    }
}
