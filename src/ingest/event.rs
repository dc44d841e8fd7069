//! The two-variant event model and the top-level update classifier.

use serde_json::Value;

use crate::error::ParseError;
use crate::telegram::types::req_i64;
use crate::telegram::{CallbackQuery, Message};

/// One accepted update, classified into exactly one kind. A "neither" state
/// cannot be constructed; classification fails instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Message { update_id: i64, message: Message },
    CallbackQuery { update_id: i64, query: CallbackQuery },
}

impl Event {
    /// Classify one raw update.
    ///
    /// `callback_query` takes precedence over `message` when both sections
    /// are present; if the winning section fails to decode, the item is
    /// dropped without falling back to the other section.
    pub fn parse(raw: &Value) -> Result<Self, ParseError> {
        let update_id = req_i64(raw, "update_id")?;

        if let Some(section) = raw.get("callback_query") {
            let query = CallbackQuery::from_value(section)?;
            return Ok(Event::CallbackQuery { update_id, query });
        }
        if let Some(section) = raw.get("message") {
            let message = Message::from_value(section)?;
            return Ok(Event::Message { update_id, message });
        }
        Err(ParseError::UnknownKind)
    }

    pub fn update_id(&self) -> i64 {
        match self {
            Event::Message { update_id, .. } | Event::CallbackQuery { update_id, .. } => *update_id,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Event::Message { .. } => "message",
            Event::CallbackQuery { .. } => "callback_query",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message_section() -> Value {
        json!({
            "message_id": 10,
            "from": { "id": 1, "first_name": "Ada" },
            "chat": { "id": 2, "type": "private" },
            "text": "hello"
        })
    }

    fn callback_section() -> Value {
        json!({
            "id": "cb1",
            "chat_instance": "inst",
            "data": "press",
            "from": { "id": 1, "first_name": "Ada" }
        })
    }

    #[test]
    fn test_classifies_message() {
        let raw = json!({ "update_id": 41, "message": message_section() });
        let event = Event::parse(&raw).unwrap();
        assert_eq!(event.update_id(), 41);
        assert_eq!(event.kind_name(), "message");
    }

    #[test]
    fn test_classifies_callback_query() {
        let raw = json!({ "update_id": 42, "callback_query": callback_section() });
        let event = Event::parse(&raw).unwrap();
        assert_eq!(event.kind_name(), "callback_query");
    }

    #[test]
    fn test_callback_query_wins_when_both_present() {
        let raw = json!({
            "update_id": 43,
            "message": message_section(),
            "callback_query": callback_section()
        });
        let event = Event::parse(&raw).unwrap();
        assert_eq!(event.kind_name(), "callback_query");
    }

    #[test]
    fn test_neither_section_fails() {
        let raw = json!({ "update_id": 44, "edited_message": {} });
        assert_eq!(Event::parse(&raw), Err(ParseError::UnknownKind));
    }

    #[test]
    fn test_missing_update_id_fails() {
        let raw = json!({ "message": message_section() });
        assert_eq!(Event::parse(&raw), Err(ParseError::MissingField("update_id")));
    }

    #[test]
    fn test_non_integer_update_id_fails() {
        let raw = json!({ "update_id": "41", "message": message_section() });
        assert_eq!(Event::parse(&raw), Err(ParseError::WrongType("update_id")));
    }

    #[test]
    fn test_no_fallback_when_winning_section_is_malformed() {
        // callback_query present but undecodable; the message section must
        // not be tried.
        let raw = json!({
            "update_id": 45,
            "callback_query": { "id": "cb1" },
            "message": message_section()
        });
        assert!(Event::parse(&raw).is_err());
    }
}
