//! # Wecom Message
//!
//! Typed inbound messages and outbound content for the enterprise messaging
//! protocol.
//!
//! - [`MessageParser`]: decrypted XML → [`Message`]
//! - [`ReplyBuilder`]: passive XML replies
//! - [`SendBuilder`]: active push request bodies
//! - [`InboundEnvelope`]: the encrypted outer request document

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod article;
pub mod envelope;
pub mod error;
pub mod message;
pub mod parser;
pub mod payload;
pub mod reply;
pub mod send;
pub mod xml;

// Re-export core types
pub use article::{Article, ArticleCollection, MAX_ARTICLES};
pub use envelope::{InboundEnvelope, render_reply_envelope};
pub use error::{MessageError, Result};
pub use message::{
    EventMessage, ImageMessage, LinkMessage, LocationMessage, Message, MessageKind, TextMessage,
    VideoMessage, VoiceMessage,
};
pub use parser::MessageParser;
pub use payload::{MediaKind, MusicPayload, Payload, VideoPayload};
pub use reply::ReplyBuilder;
pub use send::{MAX_PARTIES, MAX_USERS, Recipients, SendBuilder};
pub use xml::escape_text;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Article, ArticleCollection, Message, MessageError, MessageKind, MessageParser, Payload,
        Recipients, ReplyBuilder, Result, SendBuilder,
    };
}
