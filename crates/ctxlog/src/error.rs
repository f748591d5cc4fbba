//! # Error Types
//!
//! Building a logger never fails: unknown settings fall back to defaults.
//! The fallible surfaces are strict parsing of a single setting and
//! installing the process-global `tracing` subscriber.

use thiserror::Error;

/// Logging error
#[derive(Debug, Error)]
pub enum LoggingError
{
    /// Invalid log level
    #[error("Unknown log level: {0}. Use 'debug', 'info', 'warn', or 'error'")]
    InvalidLevel(String),

    /// Invalid log format
    #[error("Unknown log format: {0}. Use 'text' or 'json'")]
    InvalidFormat(String),

    /// Invalid log output
    #[error("Unknown log output: {0}. Use 'stdout' or 'stderr'")]
    InvalidOutput(String),

    /// Failed to install the global subscriber
    ///
    /// Happens when another subscriber was already set for the process.
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),
}

impl From<tracing_subscriber::util::TryInitError> for LoggingError
{
    fn from(err: tracing_subscriber::util::TryInitError) -> Self
    {
        Self::InitializationFailed(err.to_string())
    }
}

/// Result alias for fallible logging operations
pub type Result<T> = std::result::Result<T, LoggingError>;
