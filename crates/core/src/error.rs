//! Configuration and declaration errors.
//!
//! Both are detected eagerly, before any backend is contacted:
//!
//! | Error | When |
//! |-------|------|
//! | [`DeclarationError`] | Composing option groups or registering commands (startup) |
//! | [`ConfigError`] | Resolving supplied values into typed configs (per invocation) |
//!
//! Option names in messages use their command-line spelling (`--nbits`).

use thiserror::Error;

use crate::index::IndexType;

/// An invalid or contradictory parameter combination.
///
/// Always fatal to the current invocation and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required option was not supplied and has no default
    #[error("missing required option {option}")]
    MissingOption {
        /// Offending option
        option: String,
    },

    /// An option the command does not declare
    #[error("unknown option {option}")]
    UnknownOption {
        /// Offending option
        option: String,
    },

    /// A value that does not parse or is out of range
    #[error("invalid value {value:?} for {option}: {reason}")]
    InvalidValue {
        /// Offending option
        option: String,
        /// The value as supplied
        value: String,
        /// What is wrong with it
        reason: String,
    },

    /// A value read back with a different kind than declared
    #[error("option {option} is not a {expected}")]
    WrongType {
        /// Offending option
        option: String,
        /// Kind the reader asked for
        expected: &'static str,
    },

    /// Product-quantization bit width outside the accepted set
    #[error("invalid value {value} for --nbits: must be 4 or 8")]
    InvalidBitWidth {
        /// The rejected width
        value: u32,
    },

    /// A search parameter that belongs to a different index type
    #[error("search parameter {param} does not apply to index type {index}")]
    MismatchedSearchParam {
        /// Index type of the config
        index: IndexType,
        /// The foreign parameter
        param: String,
    },

    /// No search parameter applicable to the index type was resolved
    #[error("search parameters must be provided for index type {index}")]
    MissingSearchParam {
        /// Index type of the config
        index: IndexType,
    },
}

impl ConfigError {
    /// The option the error names, when it names one.
    pub fn option(&self) -> Option<&str> {
        match self {
            ConfigError::MissingOption { option }
            | ConfigError::UnknownOption { option }
            | ConfigError::InvalidValue { option, .. }
            | ConfigError::WrongType { option, .. } => Some(option),
            ConfigError::InvalidBitWidth { .. } => Some("--nbits"),
            ConfigError::MismatchedSearchParam { .. } | ConfigError::MissingSearchParam { .. } => {
                None
            }
        }
    }

    /// An [`ConfigError::InvalidValue`] for `option`.
    pub fn invalid(option: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            option: option.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// A broken set of declarations.
///
/// Raised while composing option groups or registering commands, so a bad
/// declaration stops the program at startup rather than mid-run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// Two distinct groups declare the same option
    #[error("option --{option} is declared by both {first} and {second}")]
    DuplicateOption {
        /// The colliding option name
        option: String,
        /// Group that declared it first
        first: &'static str,
        /// Group that declared it again
        second: &'static str,
    },

    /// Two different groups share a name
    #[error("option group {name} is declared more than once")]
    DuplicateGroup {
        /// The colliding group name
        name: String,
    },

    /// Two commands share a name
    #[error("command {name} is declared more than once")]
    DuplicateCommand {
        /// The colliding command name
        name: String,
    },
}
