//! # Wecom Cipher
//!
//! Callback signatures and envelope encryption for the enterprise messaging
//! protocol.
//!
//! - [`SignatureVerifier`]: order-independent SHA-1 signatures
//! - [`CryptoCodec`]: AES-256-CBC framing with corp id validation

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod key;
pub mod padding;
pub mod signature;

// Re-export core types
pub use codec::{CryptoCodec, EncryptedMessage};
pub use error::{CipherError, Result};
pub use key::EncodingKey;
pub use signature::SignatureVerifier;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{CipherError, CryptoCodec, EncodingKey, EncryptedMessage, Result, SignatureVerifier};
}
