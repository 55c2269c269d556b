//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add store/process context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("store not found: {0}")]
    StoreMissing(PathBuf),

    #[error("store is corrupt: {path}: {reason}")]
    StoreCorrupt { path: PathBuf, reason: String },

    #[error("cannot write store: {path}")]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot run '{alias}' ({path}): {reason}")]
    Spawn {
        alias: String,
        path: PathBuf,
        reason: String,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// Shorthand for the unknown-alias domain error.
    pub fn unknown_alias(name: &str) -> Self {
        Self::Domain(DomainError::UnknownAlias(name.to_string()))
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
