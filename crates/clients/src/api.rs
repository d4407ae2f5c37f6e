//! Backend client contract
//!
//! Defines the lifecycle every adapter implements, independent of protocol.
//!
//! IMPORTANT: transient per-call failures (network, timeouts, service
//! errors) never abort a batch. Inserts report them inside
//! [`InsertOutcome`] alongside the partial count; searches return them as
//! the `Err` value of that one call. Capability and configuration errors
//! are always distinct variants.

use serde::Serialize;
use std::fmt;

use vdbbench_core::Db;

use crate::error::{ClientError, ClientResult};

/// Operations an adapter may or may not implement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    /// Insert vectors
    Insert,
    /// Search without a filter
    Search,
    /// Search with a filter predicate
    FilteredSearch,
    /// Build or compact the index
    Optimize,
    /// Drop an existing collection before loading
    DropOld,
}

impl Operation {
    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Search => "search",
            Operation::FilteredSearch => "filtered search",
            Operation::Optimize => "optimize",
            Operation::DropOld => "drop old",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an adapter supports.
///
/// Queried up front to skip or report unsupported stages. Plain search is
/// always supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    /// Inserts are implemented
    pub insert: bool,
    /// Searches honour filters
    pub filtered_search: bool,
    /// An optimize step exists
    pub optimize: bool,
    /// Existing collections can be dropped
    pub drop_old: bool,
}

impl Capabilities {
    /// Every operation supported
    pub const ALL: Capabilities = Capabilities {
        insert: true,
        filtered_search: true,
        optimize: true,
        drop_old: true,
    };

    /// Only unfiltered search
    pub const SEARCH_ONLY: Capabilities = Capabilities {
        insert: false,
        filtered_search: false,
        optimize: false,
        drop_old: false,
    };

    /// Check if an operation is supported
    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::Insert => self.insert,
            Operation::Search => true,
            Operation::FilteredSearch => self.filtered_search,
            Operation::Optimize => self.optimize,
            Operation::DropOld => self.drop_old,
        }
    }

    /// Fail with a capability error when `operation` is unsupported
    pub fn require(&self, db: Db, operation: Operation) -> ClientResult<()> {
        if self.supports(operation) {
            Ok(())
        } else {
            Err(ClientError::unsupported(db, operation))
        }
    }
}

/// Search filter predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Filter {
    /// Only ids greater than or equal to the bound
    IdAtLeast(i64),
}

/// Result of one insert call.
#[derive(Debug)]
pub struct InsertOutcome {
    /// Vectors stored
    pub inserted: usize,
    /// Failure for the remainder, if any
    pub error: Option<ClientError>,
}

impl InsertOutcome {
    /// Everything was stored
    pub fn complete(inserted: usize) -> Self {
        Self {
            inserted,
            error: None,
        }
    }

    /// `inserted` were stored, the rest failed with `error`
    pub fn partial(inserted: usize, error: ClientError) -> Self {
        Self {
            inserted,
            error: Some(error),
        }
    }

    /// Check if nothing failed
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// A backend adapter in the unconnected state.
///
/// Holds its own copy of the connection and index configs. One instance
/// serves one run; concurrent workers each build their own.
pub trait VectorDb: Send {
    /// Backend identity
    fn db(&self) -> Db;

    /// Supported operations
    fn capabilities(&self) -> Capabilities;

    /// Acquire a connection scoped to the returned guard.
    ///
    /// The borrow prevents a second concurrent connection on the same
    /// instance. Partially acquired resources are released before an error
    /// is returned.
    fn connect(&mut self) -> ClientResult<Box<dyn Connection + '_>>;
}

/// A connected adapter.
///
/// Dropping the connection releases it; [`Connection::close`] does the same
/// but reports release failures.
pub trait Connection {
    /// Insert vectors with their integer ids.
    ///
    /// `Err` is reserved for configuration and capability errors; transient
    /// failures come back inside the outcome.
    fn insert_embeddings(
        &mut self,
        embeddings: &[Vec<f32>],
        ids: &[i64],
    ) -> ClientResult<InsertOutcome>;

    /// Up to `k` ids, ranked by the backend's own similarity ordering.
    fn search_embedding(
        &mut self,
        query: &[f32],
        k: usize,
        filter: Option<&Filter>,
    ) -> ClientResult<Vec<i64>>;

    /// Build or compact the index.
    fn optimize(&mut self, data_size: Option<usize>) -> ClientResult<()>;

    /// Release the connection, reporting failures.
    fn close(self: Box<Self>) -> ClientResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _assert_object_safe(_: &dyn VectorDb, _: &dyn Connection) {}
    }

    #[test]
    fn test_search_always_supported() {
        assert!(Capabilities::SEARCH_ONLY.supports(Operation::Search));
        assert!(!Capabilities::SEARCH_ONLY.supports(Operation::FilteredSearch));
        assert!(Capabilities::ALL.supports(Operation::DropOld));
    }

    #[test]
    fn test_require_reports_capability_error() {
        let err = Capabilities::SEARCH_ONLY
            .require(Db::LanceDbServer, Operation::Optimize)
            .unwrap_err();
        assert!(err.is_unsupported());
        assert!(Capabilities::ALL.require(Db::QdrantLocal, Operation::Insert).is_ok());
    }

    #[test]
    fn test_insert_outcome() {
        assert!(InsertOutcome::complete(10).is_complete());
        let partial = InsertOutcome::partial(4, ClientError::Backend("disk full".into()));
        assert_eq!(partial.inserted, 4);
        assert!(!partial.is_complete());
    }
}
