//! Error types for the webhook process.
//!
//! Validation failures are not errors at this level: they are returned as
//! [`AggregateError`](crate::validation::AggregateError) and become admission
//! denials. These variants cover process setup and serving failures.

use thiserror::Error;

/// Error type for webhook process operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for webhook process operations
pub type Result<T> = std::result::Result<T, Error>;
