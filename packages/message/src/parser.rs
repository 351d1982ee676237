//! Discriminator-driven parsing of decrypted message XML

use crate::message::{
    EventMessage, ImageMessage, LinkMessage, LocationMessage, Message, MessageKind, TextMessage,
    VideoMessage, VoiceMessage,
};
use crate::xml::{XmlFields, flatten};
use crate::{MessageError, Result};

type Constructor = fn(&XmlFields) -> Result<MessageKind>;

/// `MsgType` → variant constructor. Anything else parses as [`MessageKind::Unknown`].
const REGISTRY: &[(&str, Constructor)] = &[
    ("text", text),
    ("image", image),
    ("voice", voice),
    ("video", video),
    ("shortvideo", video),
    ("location", location),
    ("link", link),
    ("event", event),
];

/// Converts decrypted XML payloads into typed [`Message`]s
pub struct MessageParser;

impl MessageParser {
    /// Parse a decrypted message document
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Parse`] for malformed XML, a missing `MsgType`
    /// or a numeric field that does not parse.
    pub fn parse(xml: &[u8]) -> Result<Message> {
        let fields = flatten(xml)?;

        let type_tag = fields
            .optional("MsgType")
            .map(|tag| tag.to_lowercase())
            .ok_or_else(|| MessageError::parse("missing MsgType"))?;

        let kind = match Self::constructor(&type_tag) {
            Some(construct) => construct(&fields)?,
            None => {
                log::debug!("Unrecognised message type '{type_tag}', parsed as unknown");
                MessageKind::Unknown
            }
        };

        Ok(Message {
            from_id: fields.text("FromUserName"),
            to_id: fields.text("ToUserName"),
            create_time: fields.number("CreateTime")?.unwrap_or_default(),
            type_tag,
            msg_id: fields.number("MsgId")?,
            agent_id: fields.optional("AgentID"),
            kind,
            raw: xml.to_vec(),
        })
    }

    /// Whether `type_tag` maps to a concrete variant
    #[must_use]
    pub fn is_registered(type_tag: &str) -> bool {
        Self::constructor(&type_tag.to_lowercase()).is_some()
    }

    fn constructor(type_tag: &str) -> Option<Constructor> {
        REGISTRY
            .iter()
            .find(|(tag, _)| *tag == type_tag)
            .map(|(_, construct)| *construct)
    }
}

fn text(fields: &XmlFields) -> Result<MessageKind> {
    Ok(MessageKind::Text(TextMessage {
        content: fields.text("Content"),
    }))
}

fn image(fields: &XmlFields) -> Result<MessageKind> {
    Ok(MessageKind::Image(ImageMessage {
        pic_url: fields.text("PicUrl"),
        media_id: fields.text("MediaId"),
    }))
}

fn voice(fields: &XmlFields) -> Result<MessageKind> {
    Ok(MessageKind::Voice(VoiceMessage {
        media_id: fields.text("MediaId"),
        format: fields.text("Format"),
        recognition: fields.optional("Recognition"),
    }))
}

fn video(fields: &XmlFields) -> Result<MessageKind> {
    Ok(MessageKind::Video(VideoMessage {
        media_id: fields.text("MediaId"),
        thumb_media_id: fields.text("ThumbMediaId"),
    }))
}

fn location(fields: &XmlFields) -> Result<MessageKind> {
    Ok(MessageKind::Location(LocationMessage {
        latitude: fields.number("Location_X")?.unwrap_or_default(),
        longitude: fields.number("Location_Y")?.unwrap_or_default(),
        scale: fields.number("Scale")?.unwrap_or_default(),
        label: fields.text("Label"),
    }))
}

fn link(fields: &XmlFields) -> Result<MessageKind> {
    Ok(MessageKind::Link(LinkMessage {
        title: fields.text("Title"),
        description: fields.text("Description"),
        url: fields.text("Url"),
        pic_url: fields.text("PicUrl"),
    }))
}

fn event(fields: &XmlFields) -> Result<MessageKind> {
    Ok(MessageKind::Event(EventMessage {
        event: fields.text("Event").to_lowercase(),
        event_key: fields.optional("EventKey"),
        latitude: fields.number("Latitude")?,
        longitude: fields.number("Longitude")?,
        precision: fields.number("Precision")?,
    }))
}
