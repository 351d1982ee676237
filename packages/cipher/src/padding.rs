//! PKCS#7-style padding over 32-byte blocks
//!
//! The platform pads to a multiple of 32 bytes even though AES has a 16-byte
//! block. A plaintext that is already an exact multiple gains a full 32-byte
//! block so the last byte always encodes the pad length.

use crate::{CipherError, Result};

/// Padding block size in bytes
pub const PAD_BLOCK: usize = 32;

/// Append padding in place
pub fn pad(buf: &mut Vec<u8>) {
    let pad_len = PAD_BLOCK - (buf.len() % PAD_BLOCK);
    // pad_len is in 1..=32
    let pad_byte = pad_len as u8;
    buf.resize(buf.len() + pad_len, pad_byte);
}

/// Strip padding, returning the unpadded prefix
///
/// # Errors
///
/// Returns [`CipherError::Decrypt`] if the pad length is outside 1..=32 or
/// longer than the buffer.
pub fn unpad(buf: &[u8]) -> Result<&[u8]> {
    let Some(&last) = buf.last() else {
        return Err(CipherError::decrypt("empty plaintext"));
    };
    let pad_len = usize::from(last);
    if !(1..=PAD_BLOCK).contains(&pad_len) {
        return Err(CipherError::decrypt(format!(
            "invalid padding length {pad_len}"
        )));
    }
    if pad_len > buf.len() {
        return Err(CipherError::decrypt("padding longer than plaintext"));
    }
    Ok(&buf[..buf.len() - pad_len])
}
