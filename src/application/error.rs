//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::StoreError;

/// Application errors wrap store errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("invalid seed file {path}: {message}")]
    Seed { path: PathBuf, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid command: {message}")]
    Command { message: String },

    #[error("no integer id left above {max}")]
    IdsExhausted { max: i64 },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
