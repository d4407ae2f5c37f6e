//! Client error taxonomy.
//!
//! | Class | Variants | Handling |
//! |-------|----------|----------|
//! | Configuration | `Config` | Fatal, never retried |
//! | Capability | `Unsupported` | Caller decides |
//! | Transient | `Transport`, `Status`, `Decode`, `Timeout`, `Backend` | Reported as a value |
//! | Resource lifecycle | `Lifecycle` | Fatal to the run |

use std::time::Duration;
use thiserror::Error;

use vdbbench_core::{ConfigError, Db};

use crate::api::Operation;

/// Errors raised across the adapter boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid parameters, caught before any network call
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend has no implementation of the operation
    #[error("{operation} is not implemented for {db}")]
    Unsupported {
        /// Backend that lacks the operation
        db: Db,
        /// The missing operation
        operation: Operation,
    },

    /// The request never produced a response
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Request URL
        url: String,
        /// Transport failure
        message: String,
    },

    /// The service answered with an error status
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        /// Request URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// The response could not be decoded
    #[error("unexpected response from {url}: {message}")]
    Decode {
        /// Request URL
        url: String,
        /// Decoding failure
        message: String,
    },

    /// A bounded wait ran out
    #[error("{operation} did not finish within {after:?}")]
    Timeout {
        /// What was being waited for
        operation: String,
        /// The bound that elapsed
        after: Duration,
    },

    /// The service reported a failure state
    #[error("backend error: {0}")]
    Backend(String),

    /// Acquiring or releasing a connection failed
    #[error("connection lifecycle error: {0}")]
    Lifecycle(String),
}

/// Result type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Check if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, ClientError::Config(_))
    }

    /// Check if this is a capability error.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ClientError::Unsupported { .. })
    }

    /// Check if this is a per-call failure the driver may record and move past.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClientError::Transport { .. }
                | ClientError::Status { .. }
                | ClientError::Decode { .. }
                | ClientError::Timeout { .. }
                | ClientError::Backend(_)
        )
    }

    /// Check if this is a connection lifecycle error.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, ClientError::Lifecycle(_))
    }

    pub(crate) fn unsupported(db: Db, operation: Operation) -> Self {
        ClientError::Unsupported { db, operation }
    }
}
