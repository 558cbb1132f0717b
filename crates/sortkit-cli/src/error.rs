use std::path::PathBuf;

use sortkit_core::item::ListError;
use sortkit_runtime::{PolicyConfigError, SortableError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code for bad arguments or unreadable input.
pub const EXIT_USAGE: i32 = 2;
/// Exit code for a policy file that fails to load or validate.
pub const EXIT_CONFIG: i32 = 3;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("policy error: {0}")]
    Policy(#[from] PolicyConfigError),

    #[error("invalid list: {0}")]
    List(#[from] ListError),

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl From<SortableError> for CliError {
    fn from(err: SortableError) -> Self {
        match err {
            SortableError::InvalidPolicy(errors) => {
                Self::Policy(PolicyConfigError::Validation(errors))
            }
            SortableError::List(err) => Self::List(err),
        }
    }
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::Policy(_) => EXIT_CONFIG,
            Self::Json(_)
            | Self::List(_)
            | Self::MissingPath { .. }
            | Self::InvalidArgument { .. } => EXIT_USAGE,
            Self::Io(_) => 1,
        }
    }

    #[must_use]
    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
