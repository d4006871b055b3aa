use std::env::VarError;

use thiserror::Error;

/// Failures while assembling [`crate::config::Config`] from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The variable exists but could not be read (e.g. not unicode)
    #[error("Could not read environment: {0}")]
    EnvVarError(#[from] VarError),

    /// A setting is present but its value is unusable
    #[error("Invalid setting: {0}")]
    ParseError(String),

    /// The selected storage backend needs a setting that was not given
    #[error("Missing setting: {0}")]
    MissingValue(String),
}
