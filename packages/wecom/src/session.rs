//! Per-request exchange: authenticate, decrypt and parse one inbound message,
//! then answer it with encrypted replies.

use crate::{Result, WecomError};
use std::sync::Arc;
use wecom_cipher::{CipherError, CryptoCodec};
use wecom_common::LoggingTransformer;
use wecom_message::{
    ArticleCollection, InboundEnvelope, Message, MessageParser, MusicPayload, Payload,
    ReplyBuilder, render_reply_envelope,
};

/// Where a session is in its request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nothing parsed yet
    Unparsed,
    /// A message was parsed and can be answered
    Parsed,
    /// At least one reply was rendered; further replies are still allowed
    Responded,
}

#[derive(Debug)]
struct Exchange {
    message: Message,
    envelope: InboundEnvelope,
    timestamp: String,
    nonce: String,
}

#[derive(Debug)]
enum SessionState {
    Unparsed,
    Parsed(Exchange),
    Responded(Exchange),
}

impl SessionState {
    fn exchange(&self) -> Result<&Exchange> {
        match self {
            SessionState::Unparsed => Err(WecomError::NeedParse),
            SessionState::Parsed(exchange) | SessionState::Responded(exchange) => Ok(exchange),
        }
    }
}

/// One inbound callback and its replies.
///
/// Sessions are cheap, hold a shared [`CryptoCodec`] and are used from a
/// single request handler.
#[derive(Debug)]
pub struct ProtocolSession {
    codec: Arc<CryptoCodec>,
    state: SessionState,
}

impl ProtocolSession {
    /// Create a session over a shared codec
    #[must_use]
    pub fn new(codec: Arc<CryptoCodec>) -> Self {
        Self {
            codec,
            state: SessionState::Unparsed,
        }
    }

    /// Codec used for this session
    #[must_use]
    pub fn codec(&self) -> &CryptoCodec {
        &self.codec
    }

    /// Current lifecycle state
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match self.state {
            SessionState::Unparsed => SessionStatus::Unparsed,
            SessionState::Parsed(_) => SessionStatus::Parsed,
            SessionState::Responded(_) => SessionStatus::Responded,
        }
    }

    /// Authenticate, decrypt and parse a raw callback body.
    ///
    /// `timestamp` and `nonce` are kept and reused to sign every reply. Any
    /// failure drops a previously parsed message and leaves the session
    /// unparsed.
    ///
    /// # Errors
    ///
    /// Returns a parse error for a malformed envelope or message, a signature
    /// error if `msg_signature` does not match, or a decrypt error for any
    /// ciphertext violation.
    pub fn parse(
        &mut self,
        body: &[u8],
        msg_signature: &str,
        timestamp: &str,
        nonce: &str,
    ) -> Result<&Message> {
        self.state = SessionState::Unparsed;
        let exchange = self.authenticate(body, msg_signature, timestamp, nonce)?;
        self.state = SessionState::Parsed(exchange);
        self.message()
    }

    fn authenticate(
        &self,
        body: &[u8],
        msg_signature: &str,
        timestamp: &str,
        nonce: &str,
    ) -> Result<Exchange> {
        let envelope = InboundEnvelope::parse(body)?;

        let plaintext = self
            .codec
            .decrypt(&envelope.encrypt, msg_signature, timestamp, nonce)
            .inspect_err(|e| {
                if *e != CipherError::Signature {
                    LoggingTransformer::log_crypto_error("parse", e);
                }
            })?;

        let message = MessageParser::parse(&plaintext)?;
        LoggingTransformer::log_inbound_message(&message.type_tag, &message.from_id, plaintext.len());

        Ok(Exchange {
            message,
            envelope,
            timestamp: timestamp.to_string(),
            nonce: nonce.to_string(),
        })
    }

    /// The parsed message
    ///
    /// # Errors
    ///
    /// Returns [`WecomError::NeedParse`] before a successful [`parse`](Self::parse).
    pub fn message(&self) -> Result<&Message> {
        self.state.exchange().map(|exchange| &exchange.message)
    }

    /// The outer envelope of the parsed request
    ///
    /// # Errors
    ///
    /// Returns [`WecomError::NeedParse`] before a successful [`parse`](Self::parse).
    pub fn envelope(&self) -> Result<&InboundEnvelope> {
        self.state.exchange().map(|exchange| &exchange.envelope)
    }

    /// Render, encrypt and wrap a reply to the parsed message
    ///
    /// # Errors
    ///
    /// Returns [`WecomError::NeedParse`] before a successful parse, a
    /// construction error for incomplete payloads, or an encrypt error if the
    /// random source fails.
    pub fn response(&mut self, payload: Payload) -> Result<String> {
        let exchange = self.state.exchange()?;
        let msg_type = payload.msg_type();

        let reply = ReplyBuilder::new(&exchange.message)
            .payload(payload)?
            .render()?;
        let sealed = self
            .codec
            .encrypt(reply.as_bytes(), &exchange.nonce, &exchange.timestamp)
            .inspect_err(|e| LoggingTransformer::log_crypto_error("response", e))?;
        let envelope = render_reply_envelope(
            &sealed.ciphertext,
            &sealed.signature,
            &sealed.timestamp,
            &sealed.nonce,
        )?;
        LoggingTransformer::log_outbound_reply(msg_type, &exchange.message.from_id);

        self.state = match std::mem::replace(&mut self.state, SessionState::Unparsed) {
            SessionState::Parsed(exchange) | SessionState::Responded(exchange) => {
                SessionState::Responded(exchange)
            }
            SessionState::Unparsed => SessionState::Unparsed,
        };
        Ok(envelope)
    }

    /// Reply with text
    ///
    /// # Errors
    ///
    /// See [`response`](Self::response).
    pub fn response_text(&mut self, content: impl Into<String>) -> Result<String> {
        self.response(Payload::text(content))
    }

    /// Reply with an uploaded image
    ///
    /// # Errors
    ///
    /// See [`response`](Self::response).
    pub fn response_image(&mut self, media_id: impl Into<String>) -> Result<String> {
        self.response(Payload::image(media_id))
    }

    /// Reply with an uploaded voice clip
    ///
    /// # Errors
    ///
    /// See [`response`](Self::response).
    pub fn response_voice(&mut self, media_id: impl Into<String>) -> Result<String> {
        self.response(Payload::voice(media_id))
    }

    /// Reply with an uploaded file
    ///
    /// # Errors
    ///
    /// See [`response`](Self::response).
    pub fn response_file(&mut self, media_id: impl Into<String>) -> Result<String> {
        self.response(Payload::file(media_id))
    }

    /// Reply with an uploaded video
    ///
    /// # Errors
    ///
    /// See [`response`](Self::response).
    pub fn response_video(
        &mut self,
        media_id: impl Into<String>,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<String> {
        self.response(Payload::video(media_id, title, description))
    }

    /// Reply with a music link
    ///
    /// # Errors
    ///
    /// See [`response`](Self::response).
    pub fn response_music(&mut self, music: MusicPayload) -> Result<String> {
        self.response(Payload::music(music))
    }

    /// Reply with news articles
    ///
    /// # Errors
    ///
    /// See [`response`](Self::response).
    pub fn response_news(&mut self, articles: ArticleCollection) -> Result<String> {
        self.response(Payload::news(articles))
    }

    /// Forget the parsed message so the session can serve another request
    pub fn reset(&mut self) {
        self.state = SessionState::Unparsed;
    }
}
