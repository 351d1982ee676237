//! Encoding key material

use crate::{CipherError, Result};
use base64::{
    Engine as _, alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
};
use zeroize::Zeroizing;

/// Raw key size in bytes (AES-256)
pub const KEY_BYTES: usize = 32;
/// IV size in bytes; the IV is the key prefix
pub const IV_BYTES: usize = 16;

/// Platform keys are 43 random base64 characters, so the final symbol usually
/// carries non-zero trailing bits.
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// 256-bit symmetric key decoded from the platform `EncodingAESKey`.
/// The bytes are wiped when the key is dropped.
#[derive(Clone)]
pub struct EncodingKey(Zeroizing<[u8; KEY_BYTES]>);

impl core::fmt::Debug for EncodingKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("EncodingKey(REDACTED)")
    }
}

impl EncodingKey {
    /// Decode the 43-character key string (`=` is appended before decoding)
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not base64 or does not decode to 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let padded = Zeroizing::new(format!("{}=", encoded.trim()));
        let decoded = Zeroizing::new(
            KEY_ENGINE
                .decode(padded.as_bytes())
                .map_err(|e| CipherError::InvalidKeyEncoding(e.to_string()))?,
        );
        Self::from_slice(&decoded)
    }

    /// Build from existing raw key bytes
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_BYTES {
            return Err(CipherError::InvalidKeyLength {
                expected: KEY_BYTES,
                actual: bytes.len(),
            });
        }
        let mut key = Zeroizing::new([0u8; KEY_BYTES]);
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Build from a raw 32-byte array
    #[must_use]
    pub fn from_bytes(bytes: [u8; KEY_BYTES]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        &self.0
    }

    pub(crate) fn iv(&self) -> &[u8] {
        &self.0[..IV_BYTES]
    }
}
