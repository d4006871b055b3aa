use thiserror::Error;

use super::{RecordClientError, StoreError};

#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Malformed URL or alias
    #[error("Validation error: {0}")]
    Validation(String),

    /// Alias or short code already in use
    #[error("Conflict error: {0}")]
    Conflict(String),

    /// Operation targets a missing Id
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Every sampled short code collided
    #[error("Generation error: {0}")]
    Generation(String),

    /// Storage or network failure
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<RecordClientError> for RepositoryError {
    fn from(err: RecordClientError) -> Self {
        match err {
            RecordClientError::NotFound(msg) => Self::NotFound(msg),
            other => Self::Backend(other.to_string()),
        }
    }
}

impl From<validator::ValidationError> for RepositoryError {
    fn from(err: validator::ValidationError) -> Self {
        let message = err
            .message
            .map(|m| m.into_owned())
            .unwrap_or_else(|| err.code.into_owned());
        Self::Validation(message)
    }
}
