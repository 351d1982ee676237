//! # Wecom
//!
//! Secure callback message exchange for the enterprise messaging platform.
//!
//! Inbound callbacks are authenticated with an order-independent SHA-1
//! signature, decrypted with AES-256-CBC, checked against the configured corp
//! id and parsed into typed messages. Replies are rendered as XML, encrypted
//! and signed with the request's timestamp and nonce.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wecom::{LoggingTransformer, Wecom, WecomConfig};
//!
//! # fn handle(body: &[u8], msg_signature: &str, timestamp: &str, nonce: &str) -> wecom::Result<String> {
//! LoggingTransformer::init();
//! let wecom = Wecom::new(&WecomConfig::from_env()?)?;
//!
//! let mut session = wecom.session();
//! let message = session.parse(body, msg_signature, timestamp, nonce)?;
//! let echo = message.content().unwrap_or_default().to_string();
//! session.response_text(echo)
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod session;

pub use error::{Result, WecomError};
pub use session::{ProtocolSession, SessionStatus};

// Re-export the building blocks
pub use wecom_cipher::{CipherError, CryptoCodec, EncodingKey, EncryptedMessage, SignatureVerifier};
pub use wecom_common::{ConfigError, LoggingTransformer, WecomConfig};
pub use wecom_message::{
    Article, ArticleCollection, MediaKind, Message, MessageError, MessageKind, MessageParser,
    MusicPayload, Payload, Recipients, ReplyBuilder, SendBuilder, VideoPayload,
};

use std::sync::Arc;

/// Entry point holding the codec for one corp and agent configuration
#[derive(Debug, Clone)]
pub struct Wecom {
    codec: Arc<CryptoCodec>,
    agent_id: Option<i64>,
}

impl Wecom {
    /// Build from validated configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error for missing settings or a cipher error if
    /// the encoding key does not decode to 32 bytes.
    pub fn new(config: &WecomConfig) -> Result<Self> {
        config.validate()?;
        let codec = CryptoCodec::new(
            config.token.as_str(),
            &config.encoding_aes_key,
            config.corp_id.as_str(),
        )?;
        log::info!("Protocol layer ready for corp {}", config.corp_id);
        Ok(Self {
            codec: Arc::new(codec),
            agent_id: config.agent_id,
        })
    }

    /// Build from `WECOM_*` environment variables
    ///
    /// # Errors
    ///
    /// See [`WecomConfig::from_env`] and [`Wecom::new`].
    pub fn from_env() -> Result<Self> {
        Self::new(&WecomConfig::from_env()?)
    }

    /// Shared codec
    #[must_use]
    pub fn codec(&self) -> Arc<CryptoCodec> {
        Arc::clone(&self.codec)
    }

    /// Fresh session for one inbound request
    #[must_use]
    pub fn session(&self) -> ProtocolSession {
        ProtocolSession::new(self.codec())
    }

    /// Answer the callback URL handshake with the decrypted echo string
    ///
    /// # Errors
    ///
    /// Returns a signature error on mismatch or a decrypt error if the echo
    /// cannot be opened.
    pub fn verify_url(
        &self,
        msg_signature: &str,
        timestamp: &str,
        nonce: &str,
        echostr: &str,
    ) -> Result<String> {
        self.codec
            .verify_url(msg_signature, timestamp, nonce, echostr)
            .inspect_err(|e| {
                if *e != CipherError::Signature {
                    LoggingTransformer::log_crypto_error("verify_url", e);
                }
            })
            .map_err(WecomError::from)
    }

    /// Plain-mode signature check over token, timestamp and nonce
    #[must_use]
    pub fn check_signature(&self, signature: &str, timestamp: &str, nonce: &str) -> bool {
        self.codec.check_signature(signature, timestamp, nonce)
    }

    /// JS-SDK signature for a page URL
    #[must_use]
    pub fn jsapi_signature(&self, ticket: &str, noncestr: &str, timestamp: &str, url: &str) -> String {
        SignatureVerifier::jsapi(ticket, noncestr, timestamp, url)
    }

    /// Start an active push from `agent_id`
    ///
    /// # Errors
    ///
    /// Returns a construction error if the recipient lists exceed their limits.
    pub fn send(&self, agent_id: i64, recipients: Recipients) -> Result<SendBuilder> {
        Ok(SendBuilder::new(agent_id, recipients)?)
    }

    /// Start an active push from the configured default agent
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when no agent id was configured, or a
    /// construction error if the recipient lists exceed their limits.
    pub fn send_default(&self, recipients: Recipients) -> Result<SendBuilder> {
        let agent_id = self.agent_id.ok_or(ConfigError::Missing("agent_id"))?;
        self.send(agent_id, recipients)
    }
}
