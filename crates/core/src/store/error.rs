use thiserror::Error;

use crate::codec::DecodeError;
use crate::expr::BuildError;

/// Errors that can occur during store operations.
///
/// Backend failures are passed through under coarse categories; this crate
/// never interprets store subcodes and never retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("table '{table_name}' not found")]
    TableNotFound { table_name: String },

    #[error("store operation failed: {0}")]
    Operation(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
