//! Update ingestion and dispatch core for Telegram bots.
//!
//! Updates arrive either by long polling (`Bot::run_polling`) or through a
//! webhook listener (`Bot::run_webhook`), get classified into a two-variant
//! event model, deduplicated against the acknowledged offset, and handed to
//! one registered [`EventHandler`] in arrival order.

pub mod bot;
pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod server;
pub mod telegram;

pub use bot::Bot;
pub use config::Config;
pub use error::{ParseError, TransportError};
pub use ingest::{Event, EventHandler, HandlerContext};
