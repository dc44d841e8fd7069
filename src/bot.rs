//! Ties one ingestion mode to one registered handler.
//!
//! The mode is chosen at startup by calling either [`Bot::run_polling`] or
//! [`Bot::run_webhook`] and is not switchable at runtime; both consume the
//! same queue, offset tracker and handler registration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Config;
use crate::ingest::{poller, Dispatcher, EventHandler, EventQueue, HandlerContext, OffsetTracker, Poller};
use crate::server::webhook::{self, AppState};
use crate::telegram::{BotApi, BotProfile, HttpTransport};

pub struct Bot {
    config: Config,
    api: BotApi,
    queue: Arc<EventQueue>,
    offset: Arc<OffsetTracker>,
    handler: Option<Arc<dyn EventHandler>>,
    me: Option<BotProfile>,
}

impl Bot {
    pub fn new(config: Config) -> Result<Self> {
        let token = config.require_token()?.to_string();
        let transport = HttpTransport::new(
            &config.telegram.api_base,
            &token,
            Duration::from_secs(config.telegram.request_timeout_secs),
        )
        .context("building HTTP transport")?;
        Ok(Self::with_api(config, BotApi::new(Arc::new(transport))))
    }

    /// Construct over an existing API handle. Seam for tests and for
    /// callers that bring their own transport.
    pub fn with_api(config: Config, api: BotApi) -> Self {
        Self {
            config,
            api,
            queue: Arc::new(EventQueue::new()),
            offset: Arc::new(OffsetTracker::new()),
            handler: None,
            me: None,
        }
    }

    /// Register the event handler. Exactly one; registering again replaces
    /// the previous one.
    pub fn on_event(&mut self, handler: Arc<dyn EventHandler>) {
        self.handler = Some(handler);
    }

    pub fn api(&self) -> &BotApi {
        &self.api
    }

    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    pub fn offset(&self) -> &Arc<OffsetTracker> {
        &self.offset
    }

    /// Fetch and log the bot's own identity.
    pub async fn identify(&mut self) -> Result<&BotProfile> {
        let me = self.api.get_me().await.context("getMe failed")?;
        info!(
            id = me.id,
            name = %me.first_name,
            username = me.username.as_deref().unwrap_or("-"),
            "authenticated bot"
        );
        Ok(self.me.insert(me))
    }

    /// One manual pull-parse-enqueue cycle. Accepted events stay in the
    /// queue for the caller to drain.
    pub async fn fetch_once(&self) -> bool {
        poller::pull_cycle(
            &self.api,
            &self.offset,
            &self.queue,
            Duration::from_secs(self.config.polling.long_poll_timeout_secs),
        )
        .await
    }

    /// One-shot offset sync: pull whatever the service has queued and
    /// advance past it without dispatching anything.
    pub async fn clear_pending(&self) -> bool {
        let raws = match self.api.get_updates(self.offset.next_offset(), Duration::ZERO).await {
            Ok(raws) => raws,
            Err(err) => {
                warn!(%err, "clear_pending failed");
                return false;
            }
        };
        let discarded = raws.len();
        for raw in &raws {
            if let Some(id) = raw.get("update_id").and_then(Value::as_i64) {
                self.offset.observe(id);
            }
        }
        if discarded > 0 {
            info!(discarded, last_seen = self.offset.last_seen(), "cleared pending updates");
        }
        true
    }

    fn dispatcher(&self, handler: Arc<dyn EventHandler>) -> Dispatcher {
        let ctx = HandlerContext {
            api: self.api.clone(),
            me: self.me.clone(),
        };
        Dispatcher::new(Arc::clone(&self.queue), handler, ctx)
    }

    /// Pull mode. Runs until the process terminates.
    pub async fn run_polling(&self) -> Result<()> {
        let handler = self
            .handler
            .clone()
            .context("no event handler registered")?;

        if self.config.polling.clear_pending_on_start {
            self.clear_pending().await;
        }

        let mut poller = Poller::new(
            self.api.clone(),
            Arc::clone(&self.queue),
            Arc::clone(&self.offset),
            self.dispatcher(handler),
            &self.config.polling,
        );
        info!(
            normal_ms = self.config.polling.normal_interval_ms,
            slow_ms = self.config.polling.slow_interval_ms,
            "starting long-polling ingestion"
        );
        poller.run().await;
        Ok(())
    }

    /// Push mode. Registers the webhook with the service when a public URL
    /// is configured, then serves until the process terminates.
    pub async fn run_webhook(&self) -> Result<()> {
        let handler = self
            .handler
            .clone()
            .context("no event handler registered")?;

        if let Some(url) = &self.config.webhook.public_url {
            self.api
                .set_webhook(
                    url,
                    self.config.webhook.secret_token.as_deref(),
                    self.config.webhook.max_connections,
                )
                .await
                .context("setWebhook failed")?;
            info!(%url, "registered webhook with the service");
        }

        let state = Arc::new(AppState {
            queue: Arc::clone(&self.queue),
            offset: Arc::clone(&self.offset),
            dispatcher: Arc::new(self.dispatcher(handler)),
            secret_token: self.config.webhook.secret_token.clone(),
        });
        webhook::run(&self.config.webhook, state).await
    }
}
