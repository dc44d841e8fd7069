pub mod common;
pub mod fetch;
pub mod poll;
pub mod webhook;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gramline")]
#[command(author, version, about = "Telegram update ingestion: poll or listen, then dispatch")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(short, long, global = true, env = "GRAMLINE_CONFIG")]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest updates by long polling
    Poll,

    /// Ingest updates through the webhook listener
    Webhook,

    /// Perform a single pull cycle and dispatch what arrived
    FetchOnce,
}
