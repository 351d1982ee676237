//! Error handling for message parsing and construction

use thiserror::Error;

/// Message-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    /// Inbound XML is malformed or lacks the message type
    #[error("Parse error: {0}")]
    Parse(String),

    /// A reply or push violates a limit or misses a required field
    #[error("Construction error: {0}")]
    Construction(String),

    /// Writing the outbound document failed
    #[error("Render error: {0}")]
    Render(String),
}

impl MessageError {
    /// Create a parse error
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a construction error
    #[must_use]
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }
}

impl From<quick_xml::Error> for MessageError {
    fn from(err: quick_xml::Error) -> Self {
        MessageError::Parse(format!("XML error: {err}"))
    }
}

/// Result type for message operations
pub type Result<T> = std::result::Result<T, MessageError>;
