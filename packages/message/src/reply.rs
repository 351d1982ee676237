//! Passive replies rendered as XML

use crate::message::Message;
use crate::payload::Payload;
use crate::xml::XmlBuilder;
use crate::{MessageError, Result};

/// Builds the XML reply to one inbound [`Message`].
///
/// Addressing is reversed: the inbound sender becomes `ToUserName` and the
/// inbound recipient becomes `FromUserName`.
///
/// ```
/// use wecom_message::{MessageParser, Payload, ReplyBuilder};
///
/// let inbound = MessageParser::parse(
///     b"<xml><ToUserName>wx1</ToUserName><FromUserName>u</FromUserName>\
///       <CreateTime>1</CreateTime><MsgType>text</MsgType><Content>hi</Content></xml>",
/// )?;
/// let xml = ReplyBuilder::new(&inbound)
///     .payload(Payload::text("hello"))?
///     .render()?;
/// assert!(xml.contains("<ToUserName><![CDATA[u]]></ToUserName>"));
/// # Ok::<(), wecom_message::MessageError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ReplyBuilder<'a> {
    message: &'a Message,
    payload: Option<Payload>,
    create_time: Option<i64>,
}

impl<'a> ReplyBuilder<'a> {
    /// Start a reply to `message`
    #[must_use]
    pub fn new(message: &'a Message) -> Self {
        Self {
            message,
            payload: None,
            create_time: None,
        }
    }

    /// Set the reply content
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Construction`] if a required field is missing.
    pub fn payload(mut self, payload: Payload) -> Result<Self> {
        payload.validate()?;
        self.payload = Some(payload);
        Ok(self)
    }

    /// Shorthand for a text reply
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Construction`] if `content` is empty.
    pub fn text(self, content: impl Into<String>) -> Result<Self> {
        self.payload(Payload::text(content))
    }

    /// Pin `CreateTime` instead of using the current time
    #[must_use]
    pub fn at(mut self, create_time: i64) -> Self {
        self.create_time = Some(create_time);
        self
    }

    /// Render the reply document
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Construction`] when no payload was set, or
    /// [`MessageError::Render`] if writing fails.
    pub fn render(&self) -> Result<String> {
        let payload = self
            .payload
            .as_ref()
            .ok_or_else(|| MessageError::construction("reply has no payload"))?;
        let create_time = self
            .create_time
            .unwrap_or_else(|| chrono::Utc::now().timestamp());

        let mut xml = XmlBuilder::new();
        xml.open("xml")?;
        xml.cdata("ToUserName", &self.message.from_id)?;
        xml.cdata("FromUserName", &self.message.to_id)?;
        xml.text("CreateTime", &create_time.to_string())?;
        xml.cdata("MsgType", payload.msg_type())?;
        payload.write_xml(&mut xml)?;
        xml.close("xml")?;

        log::debug!("Rendered {} reply", payload.msg_type());
        xml.finish()
    }
}
