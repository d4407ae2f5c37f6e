//! Convenient imports for vdbbench.
//!
//! ```ignore
//! use vdbbench::prelude::*;
//!
//! let dispatcher = Dispatcher::from_registry()?;
//! let task = dispatcher.resolve("LanceDBServerIVFPQ", &raw)?;
//! ```

// Entry points
pub use vdbbench_executor::{
    ConfigFile, Dispatcher, Driver, LifecycleDriver, Outcome, RunSummary, Stage,
};

// Error handling
pub use vdbbench_executor::{Error, Result};

// Backend contract
pub use vdbbench_clients::{
    Backend, Capabilities, ClientError, ClientOptions, CommandSpec, Connection, Filter,
    InsertOutcome, Operation, TaskConfig, VectorDb,
};

// Core types
pub use vdbbench_core::{
    CaseType, ConfigError, Db, DbCaseConfig, IndexType, MetricType, RawParams, Secret,
};
