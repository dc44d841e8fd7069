//! Outbound side of the Bot API: one blocking round-trip per call.
//!
//! Pacing, retries and batch semantics live above this layer; everything
//! here either returns the raw payload or a typed [`TransportError`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::TransportError;

/// Seam between the ingestion core and the network. The reqwest
/// implementation below is the production one; tests substitute fakes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST one API method and return the raw response body.
    async fn call(&self, method: &str, body: Option<Value>) -> Result<String, TransportError>;
}

pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        token: &str,
        request_timeout: Duration,
    ) -> Result<Self, TransportError> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(TransportError::Unsupported(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| TransportError::Unknown(err.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, method: &str, body: Option<Value>) -> Result<String, TransportError> {
        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);
        let mut request = self.http.post(&url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        response.text().await.map_err(classify)
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else if err.is_builder() {
        TransportError::BadUrl(err.to_string())
    } else {
        TransportError::Unknown(err.to_string())
    }
}

/// Identity of the authenticated bot, from `getMe`.
#[derive(Debug, Clone)]
pub struct BotProfile {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

/// Typed wrapper over the transport for the handful of methods the
/// ingestion core needs. Unwraps the `{"ok": …, "result": …}` envelope.
#[derive(Clone)]
pub struct BotApi {
    transport: Arc<dyn Transport>,
}

impl BotApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn call_envelope(
        &self,
        method: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        let text = self.transport.call(method, body).await?;
        let envelope: Value = serde_json::from_str(&text)
            .map_err(|err| TransportError::Unknown(format!("malformed response body: {err}")))?;
        if envelope.get("ok").and_then(Value::as_bool) != Some(true) {
            let description = envelope
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("API call failed")
                .to_string();
            return Err(TransportError::Api(description));
        }
        Ok(envelope.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Pull pending updates. An `offset` of `last + 1` tells the service to
    /// drop everything at or below `last`; `None` means take whatever is
    /// available (first-ever pull).
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Value>, TransportError> {
        let mut body = json!({ "timeout": timeout.as_secs() });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }
        debug!(?offset, "getUpdates");
        match self.call_envelope("getUpdates", Some(body)).await? {
            Value::Array(items) => Ok(items),
            _ => Err(TransportError::Unknown(
                "getUpdates result is not an array".to_string(),
            )),
        }
    }

    pub async fn get_me(&self) -> Result<BotProfile, TransportError> {
        let result = self.call_envelope("getMe", None).await?;
        let id = result
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| TransportError::Unknown("getMe result missing id".to_string()))?;
        Ok(BotProfile {
            id,
            first_name: result
                .get("first_name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            username: result
                .get("username")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// Point the service at a push endpoint. The service stops answering
    /// `getUpdates` while a webhook is set.
    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
        max_connections: u16,
    ) -> Result<(), TransportError> {
        let mut body = json!({
            "url": url,
            "max_connections": max_connections,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(secret) = secret_token {
            body["secret_token"] = json!(secret);
        }
        self.call_envelope("setWebhook", Some(body)).await.map(|_| ())
    }

    pub async fn delete_webhook(&self, drop_pending: bool) -> Result<(), TransportError> {
        self.call_envelope(
            "deleteWebhook",
            Some(json!({ "drop_pending_updates": drop_pending })),
        )
        .await
        .map(|_| ())
    }
}
