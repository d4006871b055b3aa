use std::io::Error as IoError;

use thiserror::Error;

/// Errors raised by a link store while reading or writing the persisted blob
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] IoError),

    /// The blob exists but cannot be decoded; it is never overwritten
    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to encode stored data: {0}")]
    Encode(String),
}
