//! Typed inbound messages

/// Text message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    /// Message text
    pub content: String,
}

/// Image message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMessage {
    /// Public URL of the picture
    pub pic_url: String,
    /// Media id for later download
    pub media_id: String,
}

/// Voice message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceMessage {
    /// Media id for later download
    pub media_id: String,
    /// Audio format, e.g. `amr`
    pub format: String,
    /// Speech recognition result, when enabled for the agent
    pub recognition: Option<String>,
}

/// Video and short video message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMessage {
    /// Media id for later download
    pub media_id: String,
    /// Media id of the thumbnail
    pub thumb_media_id: String,
}

/// Location message body
#[derive(Debug, Clone, PartialEq)]
pub struct LocationMessage {
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
    /// Map zoom level
    pub scale: u32,
    /// Human readable place name
    pub label: String,
}

/// Link message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMessage {
    /// Link title
    pub title: String,
    /// Link description
    pub description: String,
    /// Target URL
    pub url: String,
    /// Cover picture URL
    pub pic_url: String,
}

/// Event notification body
#[derive(Debug, Clone, PartialEq)]
pub struct EventMessage {
    /// Event name, lowercased (`subscribe`, `click`, `location`, ...)
    pub event: String,
    /// Event key for menu and scan events
    pub event_key: Option<String>,
    /// Reported latitude for `location` events
    pub latitude: Option<f64>,
    /// Reported longitude for `location` events
    pub longitude: Option<f64>,
    /// Reported precision for `location` events
    pub precision: Option<f64>,
}

/// Variant-specific part of an inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    /// `text`
    Text(TextMessage),
    /// `image`
    Image(ImageMessage),
    /// `voice`
    Voice(VoiceMessage),
    /// `video` or `shortvideo`
    Video(VideoMessage),
    /// `location`
    Location(LocationMessage),
    /// `link`
    Link(LinkMessage),
    /// `event`
    Event(EventMessage),
    /// Any message type this crate does not model yet
    Unknown,
}

/// A decrypted, parsed inbound message. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Sender user id (`FromUserName`)
    pub from_id: String,
    /// Receiving corp id (`ToUserName`)
    pub to_id: String,
    /// Creation time in unix seconds
    pub create_time: i64,
    /// Lowercased `MsgType` discriminator
    pub type_tag: String,
    /// Platform message id; absent for events
    pub msg_id: Option<u64>,
    /// Receiving agent id
    pub agent_id: Option<String>,
    /// Variant-specific fields
    pub kind: MessageKind,
    pub(crate) raw: Vec<u8>,
}

impl Message {
    /// The decrypted XML this message was parsed from
    #[must_use]
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Text content for text messages
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::Text(text) => Some(&text.content),
            _ => None,
        }
    }

    /// Media id for image, voice and video messages
    #[must_use]
    pub fn media_id(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::Image(image) => Some(&image.media_id),
            MessageKind::Voice(voice) => Some(&voice.media_id),
            MessageKind::Video(video) => Some(&video.media_id),
            _ => None,
        }
    }

    /// Whether the discriminator was not recognised
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, MessageKind::Unknown)
    }
}
