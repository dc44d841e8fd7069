// Classification of realistic wire payloads: variant precedence, media
// collection, reply chains, and graceful sub-field degradation.

mod common;

use serde_json::json;

use gramline::ingest::Event;
use gramline::telegram::MediaKind;
use gramline::ParseError;

#[test]
fn test_full_message_update() {
    let raw = json!({
        "update_id": 100,
        "message": {
            "message_id": 55,
            "date": 1_700_000_000,
            "message_thread_id": 3,
            "from": {
                "id": 42, "is_bot": false, "first_name": "Grace",
                "last_name": "Hopper", "username": "grace", "language_code": "en"
            },
            "chat": { "id": -1001, "type": "supergroup", "title": "ops", "is_forum": true },
            "caption": "deck",
            "document": {
                "file_id": "doc1", "file_unique_id": "u1",
                "file_name": "slides.pdf", "file_size": 4096
            },
            "reply_to_message": {
                "message_id": 54,
                "from": { "id": 7, "first_name": "Ada" },
                "chat": { "id": -1001, "type": "supergroup" },
                "text": "ping"
            }
        }
    });

    let Event::Message { update_id, message } = Event::parse(&raw).unwrap() else {
        panic!("expected message event");
    };
    assert_eq!(update_id, 100);
    assert_eq!(message.id, 55);
    assert_eq!(message.thread_id, Some(3));
    assert_eq!(message.caption.as_deref(), Some("deck"));
    assert!(message.timestamp().is_some());
    assert_eq!(message.media.len(), 1);
    assert_eq!(message.media[0].kind, MediaKind::Document);
    assert_eq!(message.media[0].file_name.as_deref(), Some("slides.pdf"));
    assert_eq!(message.reply_to.unwrap().text.as_deref(), Some("ping"));
}

#[test]
fn test_callback_update_with_message_snapshot() {
    let raw = json!({
        "update_id": 101,
        "callback_query": {
            "id": "4382bfdwdsb323b2d9",
            "chat_instance": "-57373",
            "data": "confirm:order:17",
            "from": { "id": 42, "first_name": "Grace" },
            "message": {
                "message_id": 60,
                "from": { "id": 99, "is_bot": true, "first_name": "bot" },
                "chat": { "id": 42, "type": "private" },
                "text": "Confirm?"
            }
        }
    });

    let Event::CallbackQuery { update_id, query } = Event::parse(&raw).unwrap() else {
        panic!("expected callback event");
    };
    assert_eq!(update_id, 101);
    assert_eq!(query.data, "confirm:order:17");
    assert_eq!(query.message.unwrap().text.as_deref(), Some("Confirm?"));
}

#[test]
fn test_callback_precedence_over_message() {
    let mut raw = common::callback_update(102);
    raw["message"] = common::message_update(102)["message"].clone();
    assert_eq!(Event::parse(&raw).unwrap().kind_name(), "callback_query");
}

#[test]
fn test_batch_drop_accounting() {
    let batch = vec![
        common::message_update(1),
        json!({ "update_id": 2 }),                     // neither section
        common::callback_update(3),
        json!({ "update_id": "x", "message": {} }),    // bad sequence id
        common::message_update(5),
    ];

    let mut accepted = Vec::new();
    let mut dropped = 0usize;
    for raw in &batch {
        match Event::parse(raw) {
            Ok(event) => accepted.push(event.update_id()),
            Err(_) => dropped += 1,
        }
    }
    assert_eq!(accepted, vec![1, 3, 5]);
    assert_eq!(dropped, 2);
}

#[test]
fn test_message_missing_sender_fails_classification() {
    let raw = json!({
        "update_id": 103,
        "message": { "message_id": 1, "chat": { "id": 2, "type": "private" } }
    });
    assert_eq!(Event::parse(&raw), Err(ParseError::MissingField("from")));
}

#[test]
fn test_photo_sizes_all_collected() {
    let raw = json!({
        "update_id": 104,
        "message": {
            "message_id": 2,
            "from": { "id": 1, "first_name": "Ada" },
            "chat": { "id": 2, "type": "private" },
            "photo": [
                { "file_id": "s", "file_unique_id": "us", "file_size": 1000 },
                { "file_id": "m", "file_unique_id": "um", "file_size": 40_000 },
                { "file_id": "l", "file_unique_id": "ul", "file_size": 200_000 }
            ]
        }
    });
    let Event::Message { message, .. } = Event::parse(&raw).unwrap() else {
        panic!("expected message event");
    };
    assert_eq!(message.media.len(), 3);
    assert!(message.media.iter().all(|m| m.kind == MediaKind::Photo));
}
