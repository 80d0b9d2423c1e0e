//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Application(e) => match e {
                ApplicationError::Store(_)
                | ApplicationError::Seed { .. }
                | ApplicationError::Command { .. }
                | ApplicationError::IdsExhausted { .. } => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { source, .. } => {
                    match source.downcast_ref::<std::io::Error>() {
                        Some(io) if io.kind() == std::io::ErrorKind::NotFound => {
                            crate::exitcode::NOINPUT
                        }
                        _ => crate::exitcode::IOERR,
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::IoResultExt;
    use crate::domain::{NodeId, StoreError};
    use std::path::Path;

    #[test]
    fn given_store_error_when_mapping_exit_code_then_dataerr() {
        let err = CliError::from(ApplicationError::from(StoreError::NotFound(NodeId::from(1))));
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(err.to_string(), "node not found: 1");
    }

    #[test]
    fn given_missing_file_when_mapping_exit_code_then_noinput() {
        let result: std::io::Result<()> = Err(std::io::Error::from(std::io::ErrorKind::NotFound));
        let err = CliError::from(result.with_path_context("read seed", Path::new("x")).unwrap_err());
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_exhausted_ids_when_mapping_exit_code_then_dataerr() {
        let err = CliError::from(ApplicationError::IdsExhausted { max: i64::MAX });
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
        assert_ne!(err.exit_code(), crate::exitcode::OK);
    }

    #[test]
    fn given_usage_error_when_mapping_exit_code_then_usage() {
        assert_eq!(CliError::Usage("no seed".into()).exit_code(), crate::exitcode::USAGE);
    }
}
