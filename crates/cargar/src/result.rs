//! Result and error types for Cargar.

use thiserror::Error;

/// Result type for Cargar operations
pub type CargarResult<T> = Result<T, CargarError>;

/// Errors that can occur in Cargar
#[derive(Debug, Error)]
pub enum CargarError {
    /// Fixture file missing or malformed (fatal at startup)
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV parse error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Account listed in the credentials file does not exist in the store
    #[error("Account not found: {username}")]
    AccountNotFound {
        /// Username that was looked up
        username: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CargarError {
    /// Create a fixture error
    #[must_use]
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
