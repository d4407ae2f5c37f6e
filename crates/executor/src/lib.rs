//! Command dispatch and benchmark lifecycle for vdbbench.
//!
//! The executor is the single entry point between a surface (the CLI, a
//! config file, a test) and the backends:
//!
//! ```text
//! RawParams ──► Dispatcher::resolve ──► TaskConfig ──► Driver::run ──► RunSummary
//!                 │  option types, ranges
//!                 │  search parameter of the index type
//!                 └─ capabilities of the requested stages
//! ```
//!
//! Everything up to the driver is free of I/O, so `--dry-run` and every
//! configuration or capability error finish before a backend is contacted.
//!
//! # Example
//!
//! ```ignore
//! use vdbbench_executor::{Dispatcher, LifecycleDriver, Outcome};
//!
//! let dispatcher = Dispatcher::from_registry()?;
//! let raw = [("uri".to_string(), "http://localhost:8000".to_string())].into();
//! match dispatcher.dispatch("LanceDBServerIVFPQ", &raw, &LifecycleDriver::new())? {
//!     Outcome::Completed(summary) => println!("{:?}", summary.serial_search),
//!     Outcome::DryRun(task) => println!("{:?}", task),
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod dataset;
pub mod dispatcher;
pub mod driver;
pub mod error;
pub mod summary;


pub use config::ConfigFile;
pub use dataset::{Batch, Dataset};
pub use dispatcher::{Dispatcher, Outcome};
pub use driver::{case_filter, drops_old, Driver, LifecycleDriver};
pub use error::{Error, Result};
pub use summary::{
    ConcurrentStats, LoadStats, RunSummary, SearchStats, SkippedStage, Stage,
    MAX_RECORDED_ERRORS,
};
