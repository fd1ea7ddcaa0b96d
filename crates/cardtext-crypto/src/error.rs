//! Error types for key handling

use thiserror::Error;

/// Errors that can occur while parsing or persisting crypto keys
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Persisted key string was not valid hexadecimal
    #[error("invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// Persistence backend failure
    #[error("key persistence error: {0}")]
    Persistence(String),
}
