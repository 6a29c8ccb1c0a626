//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::BalanceError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                ApplicationError::Balance(b) => balance_exit_code(b),
                ApplicationError::InputNotFound(_) => crate::exitcode::NOINPUT,
                ApplicationError::InvalidTable { .. } => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
            },
        }
    }
}

/// Exit code for a check that could not produce a verdict.
pub fn balance_exit_code(e: &BalanceError) -> i32 {
    match e {
        BalanceError::DepthExceeded { .. } | BalanceError::HeightOverflow { .. } => {
            crate::exitcode::SOFTWARE
        }
        BalanceError::InvalidReference { .. } | BalanceError::NotATree { .. } => {
            crate::exitcode::DATAERR
        }
    }
}
