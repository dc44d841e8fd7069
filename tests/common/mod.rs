#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use gramline::ingest::{Event, EventHandler, HandlerContext};
use gramline::telegram::{BotApi, Transport};
use gramline::TransportError;

/// Scripted transport: responses are popped in FIFO order, every call is
/// recorded for later assertions.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<String, TransportError>>>,
    calls: Mutex<Vec<(String, Option<Value>)>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue one successful envelope with the given `result`.
    pub fn push_ok(&self, result: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(json!({ "ok": true, "result": result }).to_string()));
    }

    pub fn push_err(&self, err: TransportError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    /// Bodies of every recorded call to `method`, in call order.
    pub fn bodies(&self, method: &str) -> Vec<Option<Value>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn call(&self, method: &str, body: Option<Value>) -> Result<String, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), body));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Unknown("no scripted response".to_string())))
    }
}

/// Handler that records (update id, kind) pairs in invocation order.
#[derive(Default)]
pub struct RecordingHandler {
    pub seen: Mutex<Vec<(i64, &'static str)>>,
}

impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seen_ids(&self) -> Vec<i64> {
        self.seen.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, _ctx: &HandlerContext, event: Event) {
        self.seen
            .lock()
            .unwrap()
            .push((event.update_id(), event.kind_name()));
    }
}

pub fn api(transport: Arc<FakeTransport>) -> BotApi {
    BotApi::new(transport)
}

pub fn context(api: BotApi) -> HandlerContext {
    HandlerContext { api, me: None }
}

/// A raw message update as the wire delivers it.
pub fn message_update(update_id: i64) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id * 10,
            "date": 1_700_000_000,
            "from": { "id": 1, "is_bot": false, "first_name": "Ada" },
            "chat": { "id": 2, "type": "private" },
            "text": format!("update {update_id}")
        }
    })
}

pub fn callback_update(update_id: i64) -> Value {
    json!({
        "update_id": update_id,
        "callback_query": {
            "id": format!("cb{update_id}"),
            "chat_instance": "inst",
            "data": "press",
            "from": { "id": 1, "is_bot": false, "first_name": "Ada" }
        }
    })
}

/// An update that fails top-level classification.
pub fn unknown_update(update_id: i64) -> Value {
    json!({ "update_id": update_id, "edited_message": { "message_id": 1 } })
}

pub fn event(update_id: i64) -> Event {
    Event::parse(&message_update(update_id)).unwrap()
}
