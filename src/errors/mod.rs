use std::io::Error as IoError;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub mod config;
pub mod record_client;
pub mod repository;
pub mod storage;

pub use config::ConfigError;
pub use record_client::RecordClientError;
pub use repository::RepositoryError;
pub use storage::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    // Service-level domain errors
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Conflict error: {0}")]
    Conflict(String),
    #[error("Not found error: {0}")]
    NotFound(String),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Internal error: {0}")]
    Internal(String),
    // Infrastructure/system errors
    #[error("Server error: {0}")]
    Server(#[from] IoError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logger error: {0}")]
    Logger(String),
}

impl AppError {
    /// Short machine-readable label used in the JSON error body
    fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION",
            AppError::Conflict(_) => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Backend(_) => "BACKEND",
            AppError::Internal(_) => "INTERNAL",
            AppError::Server(_) => "SERVER",
            AppError::Config(_) => "CONFIGURATION",
            AppError::Logger(_) => "LOGGER",
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::Backend(msg)
            | AppError::Internal(msg)
            | AppError::Config(msg)
            | AppError::Logger(msg) => msg.clone(),
            AppError::Server(e) => e.to_string(),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Validation(msg) => AppError::Validation(msg),
            RepositoryError::Conflict(msg) => AppError::Conflict(msg),
            RepositoryError::NotFound(msg) => AppError::NotFound(msg),
            RepositoryError::Backend(msg) => AppError::Backend(msg),
            RepositoryError::Generation(msg) => AppError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Flatten field errors into a single string
        let mut fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reasons = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .clone()
                            .map(|m| m.into_owned())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {}", field, reasons)
            })
            .collect::<Vec<_>>();
        fields.sort();
        AppError::Validation(fields.join("; "))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_)
            | AppError::Server(_)
            | AppError::Config(_)
            | AppError::Logger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = self.detail();
        let message = if detail.trim().is_empty() {
            "An error occurred".to_string()
        } else {
            detail
        };

        HttpResponse::build(self.status_code()).json(json!({
            "type": self.kind(),
            "message": message,
            "status_code": self.status_code().as_u16(),
        }))
    }
}
