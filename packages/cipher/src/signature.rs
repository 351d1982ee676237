//! Order-independent SHA-1 callback signatures

use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

/// Signature computation and verification.
///
/// Parts are sorted byte-wise and concatenated without a separator before
/// hashing, so the result does not depend on the order they are supplied in.
pub struct SignatureVerifier;

impl SignatureVerifier {
    /// Compute the lowercase hex SHA-1 signature over `parts`
    #[must_use]
    pub fn compute<I, S>(parts: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parts: Vec<S> = parts.into_iter().collect();
        parts.sort_unstable_by(|a, b| a.as_ref().as_bytes().cmp(b.as_ref().as_bytes()));

        let mut hasher = Sha1::new();
        for part in &parts {
            hasher.update(part.as_ref().as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Check `expected` against the signature computed over `parts`
    ///
    /// Comparison is constant-time. A mismatch is reported as `false`; callers
    /// decide how to react.
    #[must_use]
    pub fn verify<I, S>(parts: I, expected: &str) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let computed = Self::compute(parts);
        computed.as_bytes().ct_eq(expected.as_bytes()).into()
    }

    /// Signature for the JS-SDK `config` call.
    ///
    /// Hashes `jsapi_ticket=..&noncestr=..&timestamp=..&url=..` with the keys in
    /// ascending order.
    #[must_use]
    pub fn jsapi(ticket: &str, noncestr: &str, timestamp: &str, url: &str) -> String {
        let mut fields = [
            ("jsapi_ticket", ticket),
            ("noncestr", noncestr),
            ("timestamp", timestamp),
            ("url", url),
        ];
        fields.sort_unstable_by_key(|(key, _)| *key);

        let joined = fields
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        hex::encode(Sha1::digest(joined.as_bytes()))
    }
}
