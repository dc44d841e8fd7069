//! Field-level decoders for the domain objects an update can carry.
//!
//! Decoding is plain `Result` control flow over `serde_json::Value` nodes:
//! required fields fail the object they belong to, optional sub-structures
//! (reply reference, embedded message, single media entry) are dropped on
//! failure without invalidating their parent.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tracing::debug;

use crate::error::ParseError;

pub(crate) fn req_i64(value: &Value, field: &'static str) -> Result<i64, ParseError> {
    match value.get(field) {
        None => Err(ParseError::MissingField(field)),
        Some(v) => v.as_i64().ok_or(ParseError::WrongType(field)),
    }
}

pub(crate) fn req_str(value: &Value, field: &'static str) -> Result<String, ParseError> {
    match value.get(field) {
        None => Err(ParseError::MissingField(field)),
        Some(v) => v
            .as_str()
            .map(str::to_string)
            .ok_or(ParseError::WrongType(field)),
    }
}

pub(crate) fn req_obj<'a>(value: &'a Value, field: &'static str) -> Result<&'a Value, ParseError> {
    match value.get(field) {
        None => Err(ParseError::MissingField(field)),
        Some(v) if v.is_object() => Ok(v),
        Some(_) => Err(ParseError::WrongType(field)),
    }
}

fn opt_i64(value: &Value, field: &str) -> Option<i64> {
    value.get(field).and_then(Value::as_i64)
}

fn opt_str(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}

fn opt_bool(value: &Value, field: &str) -> Option<bool> {
    value.get(field).and_then(Value::as_bool)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

impl User {
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            id: req_i64(value, "id")?,
            is_bot: opt_bool(value, "is_bot").unwrap_or(false),
            first_name: req_str(value, "first_name")?,
            last_name: opt_str(value, "last_name"),
            username: opt_str(value, "username"),
            language_code: opt_str(value, "language_code"),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: i64,
    pub kind: ChatKind,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub is_forum: bool,
}

impl Chat {
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        let kind = match req_str(value, "type")?.as_str() {
            "private" => ChatKind::Private,
            "group" => ChatKind::Group,
            "supergroup" => ChatKind::Supergroup,
            "channel" => ChatKind::Channel,
            _ => return Err(ParseError::WrongType("type")),
        };
        Ok(Self {
            id: req_i64(value, "id")?,
            kind,
            title: opt_str(value, "title"),
            first_name: opt_str(value, "first_name"),
            last_name: opt_str(value, "last_name"),
            username: opt_str(value, "username"),
            is_forum: opt_bool(value, "is_forum").unwrap_or(false),
        })
    }

    pub fn is_private(&self) -> bool {
        self.kind == ChatKind::Private
    }
}

/// Closed set of attachment kinds, keyed by the message field that carries
/// each of them on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Document,
    Photo,
    Animation,
    Sticker,
    Story,
    Video,
    VideoNote,
    Voice,
    Audio,
    Contact,
}

impl MediaKind {
    pub const ALL: [MediaKind; 10] = [
        MediaKind::Document,
        MediaKind::Photo,
        MediaKind::Animation,
        MediaKind::Sticker,
        MediaKind::Story,
        MediaKind::Video,
        MediaKind::VideoNote,
        MediaKind::Voice,
        MediaKind::Audio,
        MediaKind::Contact,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            MediaKind::Document => "document",
            MediaKind::Photo => "photo",
            MediaKind::Animation => "animation",
            MediaKind::Sticker => "sticker",
            MediaKind::Story => "story",
            MediaKind::Video => "video",
            MediaKind::VideoNote => "video_note",
            MediaKind::Voice => "voice",
            MediaKind::Audio => "audio",
            MediaKind::Contact => "contact",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub kind: MediaKind,
    pub file_id: String,
    pub file_unique_id: String,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
}

impl Media {
    pub fn from_value(kind: MediaKind, value: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            kind,
            file_id: req_str(value, "file_id")?,
            file_unique_id: req_str(value, "file_unique_id")?,
            file_name: opt_str(value, "file_name"),
            file_size: opt_i64(value, "file_size"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    /// Unix timestamp from the wire; 0 when absent.
    pub date: i64,
    pub thread_id: Option<i64>,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub from: User,
    pub chat: Chat,
    pub media: Vec<Media>,
    /// Replied-to message, one owned level per hop. A malformed reply is
    /// dropped, never fatal for the outer message.
    pub reply_to: Option<Box<Message>>,
}

impl Message {
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        let id = req_i64(value, "message_id")?;
        let from = User::from_value(req_obj(value, "from")?)?;
        let chat = Chat::from_value(req_obj(value, "chat")?)?;

        let reply_to = value
            .get("reply_to_message")
            .and_then(|raw| match Message::from_value(raw) {
                Ok(reply) => Some(Box::new(reply)),
                Err(err) => {
                    debug!(message_id = id, %err, "dropping malformed reply reference");
                    None
                }
            });

        let mut media = Vec::new();
        for kind in MediaKind::ALL {
            let Some(raw) = value.get(kind.wire_name()) else {
                continue;
            };
            match raw {
                // Photos arrive as an array of sizes; keep every entry.
                Value::Array(items) => {
                    for item in items {
                        match Media::from_value(kind, item) {
                            Ok(entry) => media.push(entry),
                            Err(err) => {
                                debug!(message_id = id, kind = kind.wire_name(), %err, "dropping malformed media entry");
                            }
                        }
                    }
                }
                Value::Object(_) => match Media::from_value(kind, raw) {
                    Ok(entry) => media.push(entry),
                    Err(err) => {
                        debug!(message_id = id, kind = kind.wire_name(), %err, "dropping malformed media entry");
                    }
                },
                _ => {}
            }
        }

        Ok(Self {
            id,
            date: opt_i64(value, "date").unwrap_or(0),
            thread_id: opt_i64(value, "message_thread_id"),
            text: opt_str(value, "text"),
            caption: opt_str(value, "caption"),
            from,
            chat,
            media,
            reply_to,
        })
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        if self.date > 0 {
            Utc.timestamp_opt(self.date, 0).single()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackQuery {
    pub id: String,
    pub chat_instance: String,
    /// Opaque payload attached to the pressed button.
    pub data: String,
    pub from: User,
    /// Snapshot of the message the button was attached to. Best effort: a
    /// missing or malformed snapshot drops only the reference.
    pub message: Option<Box<Message>>,
}

impl CallbackQuery {
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        let id = req_str(value, "id")?;
        let message = value
            .get("message")
            .and_then(|raw| match Message::from_value(raw) {
                Ok(snapshot) => Some(Box::new(snapshot)),
                Err(err) => {
                    debug!(callback_id = %id, %err, "dropping malformed message snapshot");
                    None
                }
            });

        Ok(Self {
            id,
            chat_instance: req_str(value, "chat_instance")?,
            data: req_str(value, "data")?,
            from: User::from_value(req_obj(value, "from")?)?,
            message,
        })
    }
}
