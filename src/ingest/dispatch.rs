//! Bridges the queue to the registered handler.
//!
//! The pull path drains in its own call stack, so a plain single pass is
//! enough. The push path spawns one detached drain task per inbound request
//! and relies on the queue's drain slot to keep at most one pass running.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::telegram::{BotApi, BotProfile};

use super::{Event, EventQueue};

/// Everything a handler may need besides the event itself.
#[derive(Clone)]
pub struct HandlerContext {
    pub api: BotApi,
    /// Identity of the authenticated bot, when `getMe` ran at startup.
    pub me: Option<BotProfile>,
}

/// User-supplied event consumer.
///
/// Invoked once per accepted event, in arrival order; invocations from one
/// drain pass never overlap. Events are not redelivered after the handler
/// returns — recovery from handler failures is the handler's own concern.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, ctx: &HandlerContext, event: Event);
}

pub struct Dispatcher {
    queue: Arc<EventQueue>,
    handler: Arc<dyn EventHandler>,
    ctx: HandlerContext,
}

impl Dispatcher {
    pub fn new(queue: Arc<EventQueue>, handler: Arc<dyn EventHandler>, ctx: HandlerContext) -> Self {
        Self { queue, handler, ctx }
    }

    /// One drain pass: snapshot under the lock, then invoke the handler for
    /// each event outside it.
    pub async fn drain(&self) {
        let batch = self.queue.drain_snapshot();
        if batch.is_empty() {
            return;
        }
        debug!(events = batch.len(), "dispatching batch");
        for event in batch {
            self.handler.handle(&self.ctx, event).await;
        }
    }

    /// Drain with the single-flight guard: callers that lose the race for
    /// the drain slot return immediately. The winner keeps re-snapshotting
    /// until the queue stays empty, so events enqueued mid-pass are not
    /// stranded waiting for the next trigger.
    pub async fn drain_single_flight(&self) {
        loop {
            if !self.queue.try_begin_drain() {
                return;
            }
            loop {
                let batch = self.queue.drain_snapshot();
                if batch.is_empty() {
                    break;
                }
                debug!(events = batch.len(), "dispatching batch");
                for event in batch {
                    self.handler.handle(&self.ctx, event).await;
                }
            }
            self.queue.end_drain();
            // A push may have slipped in between the last empty snapshot and
            // releasing the slot; its own drain task saw the slot taken and
            // skipped, so pick the work up here.
            if self.queue.is_empty() {
                return;
            }
        }
    }
}
