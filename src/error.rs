//! Error types for ecusim
//!
//! Protocol failures are not errors here: the dispatcher turns them into
//! negative responses. This enum covers transport, configuration and
//! client-input failures only.

use thiserror::Error;

/// Result type alias using EcuError
pub type Result<T> = std::result::Result<T, EcuError>;

/// Unified error type for ecusim operations
#[derive(Debug, Error)]
pub enum EcuError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server disconnected")]
    Disconnected,

    // -------------------------------------------------------------------------
    // Client Input Errors
    // -------------------------------------------------------------------------
    #[error("Invalid hex input: {0}")]
    InvalidInput(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
