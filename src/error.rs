//! Error types for api-calls.

use std::collections::TryReserveError;

use thiserror::Error;

/// Main error type for all api-calls operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// I/O error on the session stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while loading configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage for a registry entry or packet field could not be allocated.
    #[error("Allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    /// Protocol error (truncated field, oversized packet, etc.).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid configuration value.
    #[error("Config error: {0}")]
    Config(String),

    /// Integer does not name a status code.
    #[error("Invalid status code: {0}")]
    InvalidStatus(i32),
}

/// Result type alias using ApiError.
pub type Result<T> = std::result::Result<T, ApiError>;
