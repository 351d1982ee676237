//! Unified error type for the protocol layer

use thiserror::Error;
use wecom_cipher::CipherError;
use wecom_common::ConfigError;
use wecom_message::MessageError;

/// Any failure along the decrypt → parse → reply chain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WecomError {
    /// Signature, decryption or encryption failure
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Parsing or construction failure
    #[error(transparent)]
    Message(#[from] MessageError),

    /// Invalid or missing configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A message accessor or response was used before a successful parse
    #[error("No message has been parsed in this session")]
    NeedParse,
}

impl WecomError {
    /// Whether this is a signature mismatch
    #[must_use]
    pub fn is_signature(&self) -> bool {
        matches!(self, WecomError::Cipher(CipherError::Signature))
    }
}

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, WecomError>;
