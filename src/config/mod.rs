
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Env var that overrides `telegram.bot_token` from the file.
pub const TOKEN_ENV: &str = "GRAMLINE_BOT_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Per-request client timeout. Must exceed the long-poll timeout or
    /// every long poll gets cut short client-side.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_normal_interval_ms")]
    pub normal_interval_ms: u64,

    #[serde(default = "default_slow_interval_ms")]
    pub slow_interval_ms: u64,

    /// Server-side long-poll timeout for `getUpdates`. Zero means short
    /// polling.
    #[serde(default = "default_long_poll_timeout_secs")]
    pub long_poll_timeout_secs: u64,

    /// Granularity of the pacing loop.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Discard updates queued server-side before the first real pull.
    #[serde(default)]
    pub clear_pending_on_start: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            normal_interval_ms: default_normal_interval_ms(),
            slow_interval_ms: default_slow_interval_ms(),
            long_poll_timeout_secs: default_long_poll_timeout_secs(),
            tick_ms: default_tick_ms(),
            clear_pending_on_start: false,
        }
    }
}

fn default_normal_interval_ms() -> u64 {
    3000
}
fn default_slow_interval_ms() -> u64 {
    10_000
}
fn default_long_poll_timeout_secs() -> u64 {
    10
}
fn default_tick_ms() -> u64 {
    200
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_path")]
    pub path: String,

    /// When set, inbound requests must carry it in
    /// `X-Telegram-Bot-Api-Secret-Token`.
    pub secret_token: Option<String>,

    /// Public HTTPS URL to register with the service at startup. When unset
    /// the webhook must be registered out of band.
    pub public_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u16,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            path: default_path(),
            secret_token: None,
            public_url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8443
}
fn default_path() -> String {
    "/webhook".to_string()
}
fn default_max_connections() -> u16 {
    40
}

impl Config {
    /// Load from a TOML file, or defaults when no path is given. The token
    /// env var wins over the file either way.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => Config::default(),
        };

        if let Ok(token) = std::env::var(TOKEN_ENV) {
            let token = token.trim();
            if !token.is_empty() {
                config.telegram.bot_token = token.to_string();
            }
        }

        Ok(config)
    }

    pub fn require_token(&self) -> Result<&str> {
        let token = self.telegram.bot_token.trim();
        if token.is_empty() {
            bail!("telegram.bot_token or {TOKEN_ENV} is required");
        }
        Ok(token)
    }
}
