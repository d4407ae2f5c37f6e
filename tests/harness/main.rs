//! vdbbench integration suite
//!
//! Cross-crate tests: the registered commands, the dispatcher, config
//! files, and the HTTP adapters against in-process stub services.
//!
//! ```bash
//! cargo test --test harness
//! cargo test --test harness qdrant_local::
//! ```

mod common;

mod command_dispatch;
mod concurrent_runs;
mod config_file;
mod lancedb_server;
mod qdrant_local;
