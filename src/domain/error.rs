//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the alias table rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("'{0}' is a built-in command name, please pick a different name")]
    ReservedName(String),

    #[error("alias already exists: {0}")]
    AliasExists(String),

    #[error("unknown alias: {0}")]
    UnknownAlias(String),

    #[error("invalid alias name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("illegal dispatch transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },
}
