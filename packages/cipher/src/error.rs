//! Error handling for signature and envelope operations

use thiserror::Error;

/// Cipher-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// Computed signature did not match the presented one
    #[error("Signature mismatch")]
    Signature,

    /// Ciphertext could not be opened (bad base64, padding, framing or app id)
    #[error("Decryption error: {0}")]
    Decrypt(String),

    /// Plaintext could not be sealed (secure random source unavailable)
    #[error("Encryption error: {0}")]
    Encrypt(String),

    /// Invalid key length provided
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Key material is not valid base64
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),
}

impl CipherError {
    /// Create a decryption error
    #[must_use]
    pub fn decrypt(msg: impl Into<String>) -> Self {
        Self::Decrypt(msg.into())
    }

    /// Create an encryption error
    #[must_use]
    pub fn encrypt(msg: impl Into<String>) -> Self {
        Self::Encrypt(msg.into())
    }
}

impl From<base64::DecodeError> for CipherError {
    fn from(err: base64::DecodeError) -> Self {
        CipherError::Decrypt(format!("Base64 decode error: {err}"))
    }
}

/// Result type for cipher operations
pub type Result<T> = std::result::Result<T, CipherError>;
