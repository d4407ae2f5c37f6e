//! # vdbbench
//!
//! Benchmark harness driving many vector-database backends through one
//! uniform contract.
//!
//! Each backend contributes an adapter and its option declarations; the
//! harness composes them with a shared set of run options, validates the
//! result before any network call, and runs the same load / search /
//! concurrent-search lifecycle against every backend.
//!
//! ## Quick Start
//!
//! ```ignore
//! use vdbbench::prelude::*;
//!
//! let dispatcher = Dispatcher::from_registry()?;
//! let raw: RawParams = [
//!     ("url".to_string(), "http://localhost:6333".to_string()),
//!     ("num_vectors".to_string(), "10000".to_string()),
//! ]
//! .into();
//!
//! match dispatcher.dispatch("QdrantLocal", &raw, &LifecycleDriver::new())? {
//!     Outcome::Completed(summary) => println!("{:?}", summary.concurrent_search),
//!     Outcome::DryRun(task) => println!("{:?}", task),
//! }
//! ```
//!
//! ## Crates
//!
//! - [`vdbbench_core`] - index models, option declarations, secrets, config errors
//! - [`vdbbench_clients`] - the backend contract and the adapters
//! - [`vdbbench_executor`] - dispatcher, config files, lifecycle driver, run summaries

#![warn(missing_docs)]

pub mod prelude;

pub use vdbbench_clients;
pub use vdbbench_core;
pub use vdbbench_executor;

pub use vdbbench_executor::{Dispatcher, Error, LifecycleDriver, Outcome, Result, RunSummary};
