//! Outer encrypted envelopes of callback requests and responses

use crate::xml::{XmlBuilder, flatten};
use crate::{MessageError, Result};

/// Encrypted inbound request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEnvelope {
    /// Base64 ciphertext from `<Encrypt>`
    pub encrypt: String,
    /// Receiving corp id, when the platform includes it
    pub to_user_name: Option<String>,
    /// Receiving agent id, when the platform includes it
    pub agent_id: Option<String>,
}

impl InboundEnvelope {
    /// Extract the envelope fields from a raw request body
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Parse`] if the body is not UTF-8, is malformed
    /// XML or has no non-empty `<Encrypt>` element.
    pub fn parse(body: &[u8]) -> Result<Self> {
        std::str::from_utf8(body)
            .map_err(|e| MessageError::parse(format!("request body is not UTF-8: {e}")))?;
        let fields = flatten(body)?;

        let encrypt = fields
            .optional("Encrypt")
            .ok_or_else(|| MessageError::parse("missing Encrypt element"))?;

        Ok(Self {
            encrypt,
            to_user_name: fields.optional("ToUserName"),
            agent_id: fields.optional("AgentID"),
        })
    }
}

/// Render the encrypted response envelope
///
/// # Errors
///
/// Returns [`MessageError::Render`] if writing fails.
pub fn render_reply_envelope(
    encrypt: &str,
    signature: &str,
    timestamp: &str,
    nonce: &str,
) -> Result<String> {
    let mut xml = XmlBuilder::new();
    xml.open("xml")?;
    xml.cdata("Encrypt", encrypt)?;
    xml.cdata("MsgSignature", signature)?;
    xml.text("TimeStamp", timestamp)?;
    xml.cdata("Nonce", nonce)?;
    xml.close("xml")?;
    xml.finish()
}
