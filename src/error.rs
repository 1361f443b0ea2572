//! Error types shared across the server

use thiserror::Error;

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Upload of {key} failed: {reason}")]
    PutFailed { key: String, reason: String },
}
