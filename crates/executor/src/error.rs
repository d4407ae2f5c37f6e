//! Unified error for the run entry point.
//!
//! Every failure a command invocation can end with maps onto one variant,
//! and every variant onto a process exit status:
//!
//! | Variant | Exit |
//! |---------|------|
//! | `Config`, `UnknownCommand`, `ConfigFile` | 2 |
//! | `Client` (capability) | 3 |
//! | `Client` (lifecycle) | 4 |
//! | `Client` (backend), `Worker` | 1 |
//! | `Declaration` | 70 |

use thiserror::Error;

use vdbbench_clients::ClientError;
use vdbbench_core::{ConfigError, DeclarationError};

/// All vdbbench errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Broken option or command declarations
    #[error("declaration error: {0}")]
    Declaration(#[from] DeclarationError),

    /// Invalid parameters
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No command with that name
    #[error("configuration error: unknown command {name}")]
    UnknownCommand {
        /// Requested name
        name: String,
    },

    /// Unreadable or malformed config file
    #[error("configuration error: {path}: {reason}")]
    ConfigFile {
        /// File path
        path: String,
        /// What is wrong
        reason: String,
    },

    /// Failure inside a backend adapter
    #[error(transparent)]
    Client(ClientError),

    /// A concurrent search worker died
    #[error("worker failed: {0}")]
    Worker(String),
}

/// Result type for executor operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<ClientError> for Error {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Config(config) => Error::Config(config),
            other => Error::Client(other),
        }
    }
}

impl Error {
    /// Check if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::UnknownCommand { .. } | Error::ConfigFile { .. }
        )
    }

    /// Check if this is a capability error.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Client(e) if e.is_unsupported())
    }

    /// Check if this is a resource lifecycle error.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Error::Client(e) if e.is_lifecycle())
    }

    /// Process exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Declaration(_) => 70,
            _ if self.is_config() => 2,
            _ if self.is_unsupported() => 3,
            _ if self.is_lifecycle() => 4,
            _ => 1,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Declaration(_) => "DECLARATION",
            _ if self.is_config() => "CONFIG",
            _ if self.is_unsupported() => "UNSUPPORTED",
            _ if self.is_lifecycle() => "LIFECYCLE",
            _ => "BACKEND",
        }
    }
}
