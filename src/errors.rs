// errors.rs
use crate::client::ClientError;
use thiserror::Error;

/// Errors from the layers around the API client: the CLI, exports, the local
/// database and the snapshot analyzer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DbError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Snapshot error: {0}")]
    SnapshotError(String),

    #[error("I/O error on {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type AppResult<T> = Result<T, AppError>;
