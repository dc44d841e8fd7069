pub mod client;
pub mod types;

pub use client::{BotApi, BotProfile, HttpTransport, Transport};
pub use types::{CallbackQuery, Chat, ChatKind, Media, MediaKind, Message, User};
