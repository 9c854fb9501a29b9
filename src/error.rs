//! Error types for tagdict
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using DictError
pub type Result<T> = std::result::Result<T, DictError>;

/// Unified error type for tagdict operations
#[derive(Debug, Error)]
pub enum DictError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// Storage failures are surfaced exactly as the OS reported them
    #[error(transparent)]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Persistence Errors
    // -------------------------------------------------------------------------
    #[error("dictionary data is corrupt: {0}")]
    Corrupt(String),

    // -------------------------------------------------------------------------
    // Dictionary Errors
    // -------------------------------------------------------------------------
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("key already mapped to another id: {0}")]
    KeyExists(String),

    #[error("all {bits}-bit ids are allocated")]
    Exhausted { bits: u32 },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}

impl DictError {
    /// True for the corruption class of errors (bad checksum, zero id, ...)
    pub fn is_corrupt(&self) -> bool {
        matches!(self, DictError::Corrupt(_))
    }
}
