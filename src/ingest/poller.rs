//! Pull-mode ingestion: the backoff controller and the polling loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::PollingConfig;
use crate::telegram::BotApi;

use super::{Dispatcher, Event, EventQueue, OffsetTracker};

/// Consecutive failures after which the poll cadence switches to slow.
pub const FAILURE_THRESHOLD: u32 = 3;

/// Two-level pacing for the pull loop.
///
/// Deliberately not exponential: there is a normal cadence while the API is
/// healthy and a slow one once [`FAILURE_THRESHOLD`] consecutive attempts
/// have failed. A single success snaps straight back to normal.
#[derive(Debug)]
pub struct Backoff {
    normal: Duration,
    slow: Duration,
    consecutive_failures: u32,
    last_attempt: Option<Instant>,
}

impl Backoff {
    pub fn new(normal: Duration, slow: Duration) -> Self {
        Self {
            normal,
            slow,
            consecutive_failures: 0,
            last_attempt: None,
        }
    }

    pub fn is_slow(&self) -> bool {
        self.consecutive_failures >= FAILURE_THRESHOLD
    }

    pub fn current_interval(&self) -> Duration {
        if self.is_slow() {
            self.slow
        } else {
            self.normal
        }
    }

    /// Whether enough time has passed since the last attempt. Always true
    /// before the first one.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_attempt {
            None => true,
            Some(at) => now.duration_since(at) >= self.current_interval(),
        }
    }

    pub fn record(&mut self, now: Instant, success: bool) {
        self.last_attempt = Some(now);
        if success {
            self.consecutive_failures = 0;
        } else if self.consecutive_failures < FAILURE_THRESHOLD {
            self.consecutive_failures += 1;
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}

/// One pull-parse-enqueue cycle. Returns false when the transport call
/// fails; per-item classification failures are logged and do not fail the
/// cycle. The offset advances only for items that classified successfully,
/// so a dropped item is re-delivered on the next pull while an accepted one
/// never is.
pub(crate) async fn pull_cycle(
    api: &BotApi,
    offset: &OffsetTracker,
    queue: &EventQueue,
    long_poll_timeout: Duration,
) -> bool {
    let raws = match api.get_updates(offset.next_offset(), long_poll_timeout).await {
        Ok(raws) => raws,
        Err(err) => {
            warn!(%err, "getUpdates failed, no updates this cycle");
            return false;
        }
    };

    let total = raws.len();
    let mut accepted = 0usize;
    for raw in &raws {
        match Event::parse(raw) {
            Ok(event) => {
                offset.observe(event.update_id());
                queue.push(event);
                accepted += 1;
            }
            Err(err) => warn!(%err, "dropping update that failed classification"),
        }
    }
    if total > 0 {
        debug!(
            total,
            accepted,
            last_seen = offset.last_seen(),
            "pulled updates"
        );
    }
    true
}

/// Pull-mode ingestion source. Fetch, parse, enqueue and drain happen in one
/// call stack; there is nothing to coordinate with other threads beyond the
/// queue itself.
pub struct Poller {
    api: BotApi,
    queue: Arc<EventQueue>,
    offset: Arc<OffsetTracker>,
    dispatcher: Dispatcher,
    backoff: Backoff,
    long_poll_timeout: Duration,
    tick: Duration,
}

impl Poller {
    pub fn new(
        api: BotApi,
        queue: Arc<EventQueue>,
        offset: Arc<OffsetTracker>,
        dispatcher: Dispatcher,
        config: &PollingConfig,
    ) -> Self {
        Self {
            api,
            queue,
            offset,
            dispatcher,
            backoff: Backoff::new(
                Duration::from_millis(config.normal_interval_ms),
                Duration::from_millis(config.slow_interval_ms),
            ),
            long_poll_timeout: Duration::from_secs(config.long_poll_timeout_secs),
            tick: Duration::from_millis(config.tick_ms),
        }
    }

    pub async fn fetch_once(&self) -> bool {
        pull_cycle(&self.api, &self.offset, &self.queue, self.long_poll_timeout).await
    }

    /// Main loop. Never returns; process termination is the only exit.
    pub async fn run(&mut self) {
        loop {
            if self.backoff.is_due(Instant::now()) {
                let was_slow = self.backoff.is_slow();
                let ok = self.fetch_once().await;
                self.backoff.record(Instant::now(), ok);
                if ok {
                    self.dispatcher.drain().await;
                } else if self.backoff.is_slow() && !was_slow {
                    warn!(
                        failures = self.backoff.consecutive_failures(),
                        interval = ?self.backoff.current_interval(),
                        "repeated poll failures, slowing down"
                    );
                }
            }
            tokio::time::sleep(self.tick).await;
        }
    }
}
