use thiserror::Error;

/// Errors raised by the remote record backend client
#[derive(Debug, Error)]
pub enum RecordClientError {
    /// Connection, timeout or TLS failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a failure status or `success: false`
    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Malformed backend response: {0}")]
    Decode(String),
}
