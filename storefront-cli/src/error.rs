//! Error types for storefront-cli

use thiserror::Error;

/// Result type alias for storefront-cli operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur while configuring or running a command
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid seed file {path}: {message}")]
    SeedError { path: String, message: String },

    #[error("Invalid argument: {0}")]
    ArgumentError(String),

    #[error(transparent)]
    Storefront(#[from] storefront::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::ConfigError(err.to_string())
    }
}
