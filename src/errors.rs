use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("incomplete connection information: host, user and database are required")]
    IncompleteConnectionInfo,

    #[error("unsupported database type: {0:?}")]
    UnsupportedDatabase(String),

    #[error("unsupported storage type: {0:?}")]
    UnsupportedStorage(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("backup file not found: {}", path.display())]
    BackupFileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed with {status}")]
    CommandFailed {
        program: &'static str,
        status: ExitStatus,
    },

    #[error("{0} not implemented")]
    NotImplemented(&'static str),
}

pub type Result<T> = std::result::Result<T, AppError>;
