use std::sync::Arc;

use anyhow::{bail, Result};

use crate::bot::Bot;
use crate::config::Config;
use crate::ingest::{Dispatcher, HandlerContext};

use super::common::LoggingHandler;

/// One manual pull cycle: fetch, then drain whatever arrived.
pub async fn run(config: Config) -> Result<()> {
    let mut bot = Bot::new(config)?;
    bot.identify().await?;

    if !bot.fetch_once().await {
        bail!("fetch failed, no updates this cycle");
    }

    let fetched = bot.queue().len();
    let ctx = HandlerContext {
        api: bot.api().clone(),
        me: None,
    };
    let dispatcher = Dispatcher::new(Arc::clone(bot.queue()), Arc::new(LoggingHandler), ctx);
    dispatcher.drain().await;

    println!("{fetched} update(s) dispatched, offset now {}", bot.offset().last_seen());
    Ok(())
}
