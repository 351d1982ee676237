//! Outbound content shared by passive replies and active pushes

use crate::article::ArticleCollection;
use crate::xml::XmlBuilder;
use crate::{MessageError, Result};
use serde_json::{Map, Value, json};

/// Media kinds that are addressed by a single media id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// `image`
    Image,
    /// `voice`
    Voice,
    /// `file`
    File,
}

impl MediaKind {
    /// Wire `msgtype` value
    #[must_use]
    pub fn type_tag(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Voice => "voice",
            MediaKind::File => "file",
        }
    }

    fn element(self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Voice => "Voice",
            MediaKind::File => "File",
        }
    }
}

/// Video content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoPayload {
    /// Uploaded video media id
    pub media_id: String,
    /// Optional title
    pub title: Option<String>,
    /// Optional description
    pub description: Option<String>,
}

/// Music content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MusicPayload {
    /// Track title
    pub title: String,
    /// Track description
    pub description: String,
    /// Stream URL
    pub music_url: String,
    /// High quality stream URL, used on Wi-Fi
    pub hq_music_url: String,
    /// Thumbnail media id
    pub thumb_media_id: String,
}

/// Content of a reply or push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Plain text
    Text(String),
    /// Image, voice or file by media id
    Media {
        /// Which media type
        kind: MediaKind,
        /// Uploaded media id
        media_id: String,
    },
    /// Video by media id with optional caption
    Video(VideoPayload),
    /// Music link
    Music(MusicPayload),
    /// One to ten articles
    News(ArticleCollection),
}

impl Payload {
    /// Text content
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Payload::Text(content.into())
    }

    /// Image by media id
    #[must_use]
    pub fn image(media_id: impl Into<String>) -> Self {
        Self::media(MediaKind::Image, media_id)
    }

    /// Voice by media id
    #[must_use]
    pub fn voice(media_id: impl Into<String>) -> Self {
        Self::media(MediaKind::Voice, media_id)
    }

    /// File by media id
    #[must_use]
    pub fn file(media_id: impl Into<String>) -> Self {
        Self::media(MediaKind::File, media_id)
    }

    fn media(kind: MediaKind, media_id: impl Into<String>) -> Self {
        Payload::Media {
            kind,
            media_id: media_id.into(),
        }
    }

    /// Video by media id
    #[must_use]
    pub fn video(
        media_id: impl Into<String>,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        Payload::Video(VideoPayload {
            media_id: media_id.into(),
            title,
            description,
        })
    }

    /// Music link
    #[must_use]
    pub fn music(music: MusicPayload) -> Self {
        Payload::Music(music)
    }

    /// News articles
    #[must_use]
    pub fn news(articles: ArticleCollection) -> Self {
        Payload::News(articles)
    }

    /// Wire `MsgType` / `msgtype` value
    #[must_use]
    pub fn msg_type(&self) -> &'static str {
        match self {
            Payload::Text(_) => "text",
            Payload::Media { kind, .. } => kind.type_tag(),
            Payload::Video(_) => "video",
            Payload::Music(_) => "music",
            Payload::News(_) => "news",
        }
    }

    /// Check that every field the platform requires is present
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Construction`] naming the missing field.
    pub fn validate(&self) -> Result<()> {
        let missing = match self {
            Payload::Text(content) if content.is_empty() => Some("content"),
            Payload::Media { media_id, .. } if media_id.is_empty() => Some("media_id"),
            Payload::Video(video) if video.media_id.is_empty() => Some("media_id"),
            Payload::Music(music) if music.music_url.is_empty() => Some("music_url"),
            Payload::News(articles) if articles.is_empty() => Some("articles"),
            _ => None,
        };
        match missing {
            Some(field) => Err(MessageError::construction(format!(
                "{} payload requires {field}",
                self.msg_type()
            ))),
            None => Ok(()),
        }
    }

    /// Write the type-specific reply elements
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Render`] if writing fails.
    pub fn write_xml(&self, xml: &mut XmlBuilder) -> Result<()> {
        match self {
            Payload::Text(content) => xml.cdata("Content", content),
            Payload::Media { kind, media_id } => {
                xml.open(kind.element())?;
                xml.cdata("MediaId", media_id)?;
                xml.close(kind.element())
            }
            Payload::Video(video) => {
                xml.open("Video")?;
                xml.cdata("MediaId", &video.media_id)?;
                if let Some(title) = &video.title {
                    xml.cdata("Title", title)?;
                }
                if let Some(description) = &video.description {
                    xml.cdata("Description", description)?;
                }
                xml.close("Video")
            }
            Payload::Music(music) => {
                xml.open("Music")?;
                xml.cdata("Title", &music.title)?;
                xml.cdata("Description", &music.description)?;
                xml.cdata("MusicUrl", &music.music_url)?;
                xml.cdata("HQMusicUrl", &music.hq_music_url)?;
                xml.cdata("ThumbMediaId", &music.thumb_media_id)?;
                xml.close("Music")
            }
            Payload::News(articles) => {
                xml.text("ArticleCount", &articles.len().to_string())?;
                xml.open("Articles")?;
                for article in articles {
                    xml.open("item")?;
                    xml.cdata("Title", &article.title)?;
                    xml.cdata("Description", &article.description)?;
                    xml.cdata("PicUrl", &article.pic_url)?;
                    xml.cdata("Url", &article.url)?;
                    xml.close("item")?;
                }
                xml.close("Articles")
            }
        }
    }

    /// Type-specific body of an active push, keyed under [`Payload::msg_type`]
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Payload::Text(content) => json!({ "content": content }),
            Payload::Media { media_id, .. } => json!({ "media_id": media_id }),
            Payload::Video(video) => {
                let mut body = Map::new();
                body.insert("media_id".into(), Value::from(video.media_id.as_str()));
                if let Some(title) = &video.title {
                    body.insert("title".into(), Value::from(title.as_str()));
                }
                if let Some(description) = &video.description {
                    body.insert("description".into(), Value::from(description.as_str()));
                }
                Value::Object(body)
            }
            Payload::Music(music) => json!({
                "title": music.title,
                "description": music.description,
                "musicurl": music.music_url,
                "hqmusicurl": music.hq_music_url,
                "thumb_media_id": music.thumb_media_id,
            }),
            Payload::News(articles) => json!({ "articles": articles.as_slice() }),
        }
    }
}
