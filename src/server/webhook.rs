//! Push-mode ingestion: the webhook listener.
//!
//! Each inbound request is parsed and enqueued inline, then a detached
//! drain task is spawned off the request path. The queue's drain slot keeps
//! at most one handler pass running no matter how many requests land
//! concurrently. The response is always the fixed acknowledgment body;
//! whatever happened to the payload is our problem, not the service's.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::WebhookConfig;
use crate::ingest::{Dispatcher, Event, EventQueue, OffsetTracker};

pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Shared state for the request handlers. The queue and the offset tracker
/// are the only state touched by both the listener and the drain tasks.
pub struct AppState {
    pub queue: Arc<EventQueue>,
    pub offset: Arc<OffsetTracker>,
    pub dispatcher: Arc<Dispatcher>,
    pub secret_token: Option<String>,
}

pub fn router(path: &str, state: Arc<AppState>) -> Router {
    Router::new()
        .route(path, post(receive_update))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: &WebhookConfig, state: Arc<AppState>) -> Result<()> {
    let app = router(&config.path, state);
    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .context("invalid webhook bind address")?;

    info!("Listening for webhook updates on http://{}{}", addr, config.path);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("binding webhook listener")?;
    axum::serve(listener, app).await.context("webhook server")?;

    Ok(())
}

pub async fn receive_update(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(raw): Json<Value>,
) -> Response {
    if let Some(expected) = &state.secret_token {
        let received = headers.get(SECRET_TOKEN_HEADER);
        if received.map(|value| value.as_bytes()) != Some(expected.as_bytes()) {
            warn!("rejecting webhook request with missing or wrong secret token");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    match Event::parse(&raw) {
        Ok(event) => {
            // The push path keeps the offset current for introspection only;
            // the service decides what to deliver.
            state.offset.observe(event.update_id());
            state.queue.push(event);

            let dispatcher = Arc::clone(&state.dispatcher);
            tokio::spawn(async move {
                dispatcher.drain_single_flight().await;
            });
        }
        Err(err) => warn!(%err, "dropping webhook update that failed classification"),
    }

    ack()
}

/// Fixed acknowledgment, sent regardless of processing outcome so the
/// service never re-posts a payload we chose to drop.
fn ack() -> Response {
    Json(json!({
        "status": "success",
        "data": { "message": "message received" }
    }))
    .into_response()
}
