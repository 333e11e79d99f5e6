//! Error types for the home IP sync
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the home IP sync
#[derive(Error, Debug)]
pub enum Error {
    /// Hostname resolver errors (construction, not lookups)
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// Parameter store access errors (anything other than "not found")
    #[error("Parameter store error: {0}")]
    ParameterStore(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend-specific error
    #[error("Store backend error ({backend}): {message}")]
    Backend {
        /// Backend name
        backend: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a resolver error
    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    /// Create a parameter store error
    pub fn parameter_store(msg: impl Into<String>) -> Self {
        Self::ParameterStore(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a backend-specific error
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from missing or invalid configuration
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
