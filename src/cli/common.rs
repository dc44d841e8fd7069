use async_trait::async_trait;
use tracing::info;

use crate::ingest::{Event, EventHandler, HandlerContext};

/// Default handler for the CLI: logs each dispatched event.
pub struct LoggingHandler;

#[async_trait]
impl EventHandler for LoggingHandler {
    async fn handle(&self, _ctx: &HandlerContext, event: Event) {
        match &event {
            Event::Message { update_id, message } => {
                info!(
                    update_id,
                    message_id = message.id,
                    chat = message.chat.id,
                    from = %message.from.first_name,
                    when = message
                        .timestamp()
                        .map(|ts| ts.to_rfc3339())
                        .unwrap_or_else(|| "-".to_string()),
                    text = message.text.as_deref().or(message.caption.as_deref()).unwrap_or(""),
                    "message"
                );
                for media in &message.media {
                    info!(
                        update_id,
                        kind = media.kind.wire_name(),
                        file_id = %media.file_id,
                        "attachment"
                    );
                }
            }
            Event::CallbackQuery { update_id, query } => {
                info!(
                    update_id,
                    query_id = %query.id,
                    from = %query.from.first_name,
                    data = %query.data,
                    "callback query"
                );
            }
        }
    }
}
