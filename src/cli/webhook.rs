use std::sync::Arc;

use anyhow::Result;

use crate::bot::Bot;
use crate::config::Config;

use super::common::LoggingHandler;

pub async fn run(config: Config) -> Result<()> {
    let mut bot = Bot::new(config)?;
    bot.on_event(Arc::new(LoggingHandler));
    bot.identify().await?;
    bot.run_webhook().await
}
