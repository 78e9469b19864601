//! Configuration errors.

use super::error_code::{self, ArchcovErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid config in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("{field} is not configured")]
    NotInitialized { field: String },
}

impl ArchcovErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotInitialized { .. } => error_code::CONFIG_NOT_INITIALIZED,
            _ => error_code::CONFIG_ERROR,
        }
    }
}
