//! Envelope encryption for callback payloads
//!
//! Plaintext framing before padding and encryption:
//!
//! ```text
//! [RANDOM(16)][LEN(4, big-endian)][MESSAGE(LEN)][CORP_ID]
//! ```
//!
//! The frame is padded to a multiple of 32 bytes and encrypted with
//! AES-256-CBC, using the first 16 key bytes as IV.

use crate::key::EncodingKey;
use crate::padding::{pad, unpad};
use crate::signature::SignatureVerifier;
use crate::{CipherError, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::NoPadding};
use log::{debug, warn};
use zeroize::Zeroizing;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Random prefix size in bytes
pub const RANDOM_BYTES: usize = 16;
/// Length field size in bytes
pub const LENGTH_BYTES: usize = 4;
const HEADER_BYTES: usize = RANDOM_BYTES + LENGTH_BYTES;

/// Encrypted payload together with the values its signature covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedMessage {
    /// Base64 ciphertext
    pub ciphertext: String,
    /// Lowercase hex SHA-1 over token, timestamp, nonce and ciphertext
    pub signature: String,
    /// Timestamp covered by the signature
    pub timestamp: String,
    /// Nonce covered by the signature
    pub nonce: String,
}

/// Signs, encrypts and decrypts callback payloads for one corp.
///
/// Holds only static configuration, so one instance can be shared across
/// threads behind an `Arc`.
#[derive(Clone)]
pub struct CryptoCodec {
    token: String,
    corp_id: String,
    key: EncodingKey,
}

impl core::fmt::Debug for CryptoCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CryptoCodec")
            .field("token", &"REDACTED")
            .field("corp_id", &self.corp_id)
            .field("key", &self.key)
            .finish()
    }
}

impl CryptoCodec {
    /// Create a codec from the platform-issued 43-character `EncodingAESKey`
    ///
    /// # Errors
    ///
    /// Returns an error if the key string does not decode to 32 bytes.
    pub fn new(
        token: impl Into<String>,
        encoding_aes_key: &str,
        corp_id: impl Into<String>,
    ) -> Result<Self> {
        let key = EncodingKey::from_base64(encoding_aes_key)?;
        Ok(Self::with_key(token, key, corp_id))
    }

    /// Create a codec from already decoded key material
    #[must_use]
    pub fn with_key(token: impl Into<String>, key: EncodingKey, corp_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            corp_id: corp_id.into(),
            key,
        }
    }

    /// Configured corp id
    #[must_use]
    pub fn corp_id(&self) -> &str {
        &self.corp_id
    }

    /// Signature over token, timestamp, nonce and `payload`
    #[must_use]
    pub fn sign(&self, timestamp: &str, nonce: &str, payload: &str) -> String {
        SignatureVerifier::compute([self.token.as_str(), timestamp, nonce, payload])
    }

    /// Verify a signature over token, timestamp, nonce and `payload`
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Signature`] on mismatch.
    pub fn verify_signature(
        &self,
        signature: &str,
        timestamp: &str,
        nonce: &str,
        payload: &str,
    ) -> Result<()> {
        if SignatureVerifier::verify([self.token.as_str(), timestamp, nonce, payload], signature) {
            Ok(())
        } else {
            warn!("Signature rejected (timestamp: {timestamp})");
            Err(CipherError::Signature)
        }
    }

    /// Plain-mode signature check over token, timestamp and nonce
    #[must_use]
    pub fn check_signature(&self, signature: &str, timestamp: &str, nonce: &str) -> bool {
        if signature.is_empty() || timestamp.is_empty() || nonce.is_empty() {
            return false;
        }
        SignatureVerifier::verify([self.token.as_str(), timestamp, nonce], signature)
    }

    /// Authenticate and decrypt a callback payload
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Signature`] if the signature does not match, or
    /// [`CipherError::Decrypt`] for any structural violation.
    pub fn decrypt(
        &self,
        ciphertext: &str,
        signature: &str,
        timestamp: &str,
        nonce: &str,
    ) -> Result<Vec<u8>> {
        self.verify_signature(signature, timestamp, nonce, ciphertext)?;
        self.open(ciphertext)
    }

    /// Encrypt and sign an outbound payload
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Encrypt`] if the secure random source is unavailable.
    pub fn encrypt(&self, plaintext: &[u8], nonce: &str, timestamp: &str) -> Result<EncryptedMessage> {
        let ciphertext = self.seal(plaintext)?;
        let signature = self.sign(timestamp, nonce, &ciphertext);
        Ok(EncryptedMessage {
            ciphertext,
            signature,
            timestamp: timestamp.to_string(),
            nonce: nonce.to_string(),
        })
    }

    /// Verify the one-time URL handshake and return the decrypted echo string
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Signature`] on mismatch or [`CipherError::Decrypt`]
    /// if the echo cannot be opened or is not UTF-8.
    pub fn verify_url(
        &self,
        signature: &str,
        timestamp: &str,
        nonce: &str,
        echostr: &str,
    ) -> Result<String> {
        let echo = self.decrypt(echostr, signature, timestamp, nonce)?;
        String::from_utf8(echo).map_err(|e| CipherError::decrypt(format!("Invalid UTF-8 echo: {e}")))
    }

    /// Frame, pad and encrypt `plaintext`, returning base64 ciphertext
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Encrypt`] if the secure random source is unavailable
    /// or the payload is too large to frame.
    pub fn seal(&self, plaintext: &[u8]) -> Result<String> {
        let msg_len = u32::try_from(plaintext.len())
            .map_err(|_| CipherError::encrypt("payload exceeds 4 GiB"))?;

        let mut prefix = [0u8; RANDOM_BYTES];
        getrandom::fill(&mut prefix)
            .map_err(|e| CipherError::encrypt(format!("Secure random source unavailable: {e}")))?;

        let mut buf = Zeroizing::new(Vec::with_capacity(
            HEADER_BYTES + plaintext.len() + self.corp_id.len() + crate::padding::PAD_BLOCK,
        ));
        buf.extend_from_slice(&prefix);
        buf.extend_from_slice(&msg_len.to_be_bytes());
        buf.extend_from_slice(plaintext);
        buf.extend_from_slice(self.corp_id.as_bytes());
        pad(&mut buf);

        let framed_len = buf.len();
        let cipher = Aes256CbcEnc::new_from_slices(self.key.as_bytes(), self.key.iv())
            .map_err(|e| CipherError::encrypt(format!("Cipher initialization failed: {e}")))?;
        let ciphertext = cipher
            .encrypt_padded_mut::<NoPadding>(buf.as_mut_slice(), framed_len)
            .map_err(|e| CipherError::encrypt(format!("Block encryption failed: {e}")))?;

        debug!("Sealed payload ({} bytes plaintext)", plaintext.len());
        Ok(STANDARD.encode(ciphertext))
    }

    /// Decrypt base64 ciphertext and unwrap the framed message
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Decrypt`] for bad base64, block length, padding,
    /// truncated frames or a corp id mismatch.
    pub fn open(&self, ciphertext: &str) -> Result<Vec<u8>> {
        let mut buf = Zeroizing::new(STANDARD.decode(ciphertext.trim())?);

        let cipher = Aes256CbcDec::new_from_slices(self.key.as_bytes(), self.key.iv())
            .map_err(|e| CipherError::decrypt(format!("Cipher initialization failed: {e}")))?;
        let padded = cipher
            .decrypt_padded_mut::<NoPadding>(buf.as_mut_slice())
            .map_err(|e| CipherError::decrypt(format!("Block decryption failed: {e}")))?;
        let frame = unpad(padded)?;

        if frame.len() < HEADER_BYTES {
            return Err(CipherError::decrypt("frame shorter than header"));
        }
        let mut len_bytes = [0u8; LENGTH_BYTES];
        len_bytes.copy_from_slice(&frame[RANDOM_BYTES..HEADER_BYTES]);
        let msg_len = usize::try_from(u32::from_be_bytes(len_bytes))
            .map_err(|_| CipherError::decrypt("message length overflow"))?;

        let body = &frame[HEADER_BYTES..];
        if msg_len > body.len() {
            return Err(CipherError::decrypt(format!(
                "message length {msg_len} exceeds remaining {} bytes",
                body.len()
            )));
        }
        let (message, app_id) = body.split_at(msg_len);
        if app_id != self.corp_id.as_bytes() {
            warn!("Corp id mismatch in decrypted payload");
            return Err(CipherError::decrypt("corp id mismatch"));
        }

        debug!("Opened payload ({msg_len} bytes)");
        Ok(message.to_vec())
    }
}
