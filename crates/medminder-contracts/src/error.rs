//! Error types shared by every MedMinder crate.
//!
//! Missing records and operations attempted without an active profile are
//! not errors; those surface as `bool` / `Option` return values on the store.
//! `MedMinderError` is reserved for backend failures, malformed blobs,
//! configuration problems, and rejected user input.

use thiserror::Error;

/// The unified error type for MedMinder.
#[derive(Debug, Error)]
pub enum MedMinderError {
    /// The key-value backend could not be read or written.
    #[error("storage error: {reason}")]
    Storage { reason: String },

    /// A persisted blob could not be encoded or decoded.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// User input was rejected before reaching the store.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The authentication service refused the request.
    #[error("authentication failed: {reason}")]
    Auth { reason: String },
}

impl MedMinderError {
    /// Shorthand for a `Validation` error on `field`.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for MedMinderError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            reason: e.to_string(),
        }
    }
}

/// Convenience alias used throughout the MedMinder crates.
pub type MedMinderResult<T> = Result<T, MedMinderError>;
