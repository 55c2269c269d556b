//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Settings(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => exitcode::USAGE,
            CliError::NotFound(_) => exitcode::NOINPUT,
            CliError::Settings(_) => exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Domain(d) => match d {
            DomainError::ReservedName(_)
            | DomainError::AliasExists(_)
            | DomainError::InvalidName { .. } => exitcode::USAGE,
            DomainError::UnknownAlias(_) => exitcode::NOINPUT,
            DomainError::IllegalTransition { .. } => exitcode::SOFTWARE,
        },
        ApplicationError::StoreMissing(_) => exitcode::NOINPUT,
        ApplicationError::StoreCorrupt { .. } => exitcode::DATAERR,
        ApplicationError::StoreWrite { .. } => exitcode::CANTCREAT,
        ApplicationError::Spawn { .. } => exitcode::OSERR,
        ApplicationError::Config { .. } => exitcode::CONFIG,
        ApplicationError::OperationFailed { .. } => exitcode::SOFTWARE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_validation_errors_when_mapping_then_codes_are_distinct() {
        let reserved: CliError =
            ApplicationError::Domain(DomainError::ReservedName("list".into())).into();
        let unknown: CliError = ApplicationError::unknown_alias("x").into();
        let corrupt: CliError = ApplicationError::StoreCorrupt {
            path: PathBuf::from("/s.json"),
            reason: "eof".into(),
        }
        .into();

        assert_eq!(reserved.exit_code(), exitcode::USAGE);
        assert_eq!(unknown.exit_code(), exitcode::NOINPUT);
        assert_eq!(corrupt.exit_code(), exitcode::DATAERR);
    }

    #[test]
    fn given_spawn_error_when_mapping_then_os_error() {
        let spawn: CliError = ApplicationError::Spawn {
            alias: "build".into(),
            path: PathBuf::from("/missing"),
            reason: "target does not exist".into(),
        }
        .into();
        assert_eq!(spawn.exit_code(), exitcode::OSERR);
        assert!(spawn.to_string().contains("build"));
    }
}
