//! Backend client contract and adapters.
//!
//! Every supported vector database is driven through the same lifecycle:
//!
//! ```text
//! ClientFactory::new_client ──► VectorDb ──connect()──► Connection ──drop/close──► released
//!                                              │
//!                                              ├─ insert_embeddings
//!                                              ├─ search_embedding
//!                                              └─ optimize
//! ```
//!
//! Operations only exist on a [`Connection`], so the type system enforces
//! the `Unconnected → Connected → Disconnected` state machine. Dropping a
//! connection releases it on every exit path.
//!
//! ## Adding a backend
//!
//! 1. Implement [`Backend`] with its connection config and index config
//! 2. Implement [`VectorDb`] and [`Connection`] for the adapter
//! 3. Declare its option groups and [`CommandSpec`]s
//! 4. List its commands in [`registry::commands`]
//!
//! Nothing in the dispatcher changes.

#![warn(missing_docs)]

pub mod api;
pub mod backend;
pub mod command;
pub mod error;
mod http;
pub mod lancedb_server;
pub mod qdrant_local;
pub mod registry;
pub mod task;

pub use api::{Capabilities, Connection, Filter, InsertOutcome, Operation, VectorDb};
pub use backend::{Backend, ClientFactory, ClientOptions, DbConfig};
pub use command::CommandSpec;
pub use error::{ClientError, ClientResult};
pub use lancedb_server::LanceDbServer;
pub use qdrant_local::QdrantLocal;
pub use task::TaskConfig;
